use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

/// Row of mutually exclusive buttons;
/// exactly one carries `active`.
#[derive(Properties, PartialEq)]
pub struct SelectorBarProps {
  pub label:        &'static str,
  pub button_class: &'static str,
  pub items:
    Vec<(&'static str, &'static str)>,
  pub active:       &'static str,
  pub on_select:    Callback<&'static str>
}

#[function_component(SelectorBar)]
pub fn selector_bar(
  props: &SelectorBarProps
) -> Html {
  html! {
      <div class="selector">
          <span class="selector-label">{ props.label }</span>
          {
              for props.items.iter().map(|(key, label)| {
                  let key = *key;
                  let on_select = props.on_select.clone();
                  let active = (key == props.active).then_some("active");
                  html! {
                      <button
                          class={classes!(props.button_class, active)}
                          onclick={move |_| on_select.emit(key)}
                      >
                          { *label }
                      </button>
                  }
              })
          }
      </div>
  }
}
