use docket_core::TaskId;
use docket_core::render::Body;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskListRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub body:      Body,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  html! {
      <ul id="taskList" class="task-list">
          {
              match &props.body {
                  Body::Empty(placeholder) => html! {
                      <li class="empty-state">{ placeholder.message() }</li>
                  },
                  Body::Rows(rows) => rows
                      .iter()
                      .cloned()
                      .map(|row| html! {
                          <TaskListRow
                              key={row.id.0}
                              row={row.clone()}
                              on_toggle={props.on_toggle.clone()}
                              on_delete={props.on_delete.clone()}
                          />
                      })
                      .collect::<Html>(),
              }
          }
      </ul>
  }
}
