use docket_core::view::Counts;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct StatsBarProps {
  pub counts: Counts
}

#[function_component(StatsBar)]
pub fn stats_bar(
  props: &StatsBarProps
) -> Html {
  html! {
      <div class="stats">
          <div>{ "Total: " }<span id="totalTasks">{ props.counts.total.to_string() }</span></div>
          <div>{ "Active: " }<span id="activeTasks">{ props.counts.active.to_string() }</span></div>
          <div>{ "Completed: " }<span id="completedTasks">{ props.counts.completed.to_string() }</span></div>
      </div>
  }
}
