use docket_core::TaskId;
use docket_core::render::Row;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskListRowProps {
  pub row:       Row,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

pub fn row_class(row: &Row) -> String {
  let mut class = format!(
    "task-item priority-{}",
    row.priority.as_key()
  );
  if row.completed {
    class.push_str(" completed");
  }
  class
}

#[function_component(TaskListRow)]
pub fn task_list_row(
  props: &TaskListRowProps
) -> Html {
  let id = props.row.id;
  let on_toggle =
    props.on_toggle.clone();
  let on_delete =
    props.on_delete.clone();

  html! {
      <li class={row_class(&props.row)} data-id={id.to_string()}>
          <input
              type="checkbox"
              checked={props.row.completed}
              onclick={move |_| on_toggle.emit(id)}
          />
          <span class="task-text">{ &props.row.text }</span>
          <span class="priority-badge">{ props.row.priority.as_key() }</span>
          <button class="delete-btn" onclick={move |_| on_delete.emit(id)}>
              { "Delete" }
          </button>
      </li>
  }
}
