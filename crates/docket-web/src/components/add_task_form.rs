use docket_core::Priority;
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct AddTaskFormProps {
  pub text:        String,
  pub priority:    Priority,
  pub on_text:     Callback<String>,
  pub on_priority: Callback<Priority>,
  pub on_submit:   Callback<()>
}

#[function_component(AddTaskForm)]
pub fn add_task_form(
  props: &AddTaskFormProps
) -> Html {
  let on_input = {
    let on_text = props.on_text.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: HtmlInputElement =
          e.target_unchecked_into();
        on_text.emit(input.value());
      }
    )
  };

  let on_change = {
    let on_priority =
      props.on_priority.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: HtmlSelectElement =
          e.target_unchecked_into();
        on_priority.emit(
          Priority::normalize(Some(
            select.value().as_str()
          ))
        );
      }
    )
  };

  let on_keydown = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: web_sys::KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          on_submit.emit(());
        }
      }
    )
  };

  let on_click = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |_: web_sys::MouseEvent| {
        on_submit.emit(())
      }
    )
  };

  html! {
      <div class="input-row">
          <input
              id="taskInput"
              value={props.text.clone()}
              placeholder="What needs to be done?"
              oninput={on_input}
              onkeydown={on_keydown}
          />
          <select id="prioritySelect" onchange={on_change}>
              {
                  for Priority::ALL.iter().map(|p| html! {
                      <option value={p.as_key()} selected={*p == props.priority}>
                          { p.label() }
                      </option>
                  })
              }
          </select>
          <button id="addTaskBtn" onclick={on_click}>{ "Add Task" }</button>
      </div>
  }
}
