use docket_core::{
  Event,
  Filter,
  Priority,
  SortMode,
  TaskDraft,
  TaskId
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_reducer,
  use_state
};

use crate::components::{
  AddTaskForm,
  SelectorBar,
  StatsBar,
  TaskList
};
use crate::surface::BrowserState;

fn filter_items()
-> Vec<(&'static str, &'static str)> {
  Filter::ALL
    .iter()
    .map(|f| (f.as_key(), f.label()))
    .collect()
}

fn sort_items()
-> Vec<(&'static str, &'static str)> {
  SortMode::ALL
    .iter()
    .map(|s| (s.as_key(), s.label()))
    .collect()
}

#[function_component(App)]
pub fn app() -> Html {
  let state =
    use_reducer(BrowserState::default);
  let draft_text = use_state(String::new);
  let draft_priority =
    use_state(Priority::default);

  {
    let state = state.clone();
    use_effect_with((), move |_| {
      tracing::debug!(
        "app mounted, seeding tasks"
      );
      state.dispatch(Event::Load);
      || ()
    });
  }

  // Fires after the frame carrying this
  // alert is rendered.
  {
    let alert =
      state.surface().alert.clone();
    use_effect_with(
      state.surface().alert_seq,
      move |seq| {
        if *seq > 0
          && let Some(message) = alert
        {
          gloo::dialogs::alert(&message);
        }
        || ()
      }
    );
  }

  {
    let draft_text = draft_text.clone();
    let draft_priority =
      draft_priority.clone();
    use_effect_with(
      state.surface().input_epoch,
      move |epoch| {
        if *epoch > 0 {
          draft_text.set(String::new());
          draft_priority
            .set(Priority::Medium);
        }
        || ()
      }
    );
  }

  let on_text = {
    let draft_text = draft_text.clone();
    Callback::from(move |text: String| {
      draft_text.set(text)
    })
  };

  let on_priority = {
    let draft_priority =
      draft_priority.clone();
    Callback::from(
      move |priority: Priority| {
        draft_priority.set(priority)
      }
    )
  };

  let on_submit = {
    let state = state.clone();
    let draft_text = draft_text.clone();
    let draft_priority =
      draft_priority.clone();
    Callback::from(move |()| {
      let draft = TaskDraft::new(
        (*draft_text).clone()
      )
      .with_priority(
        draft_priority.as_key()
      );
      state.dispatch(Event::Submit(draft));
    })
  };

  let on_toggle = {
    let state = state.clone();
    Callback::from(move |id: TaskId| {
      state.dispatch(Event::Toggle { id })
    })
  };

  let on_delete = {
    let state = state.clone();
    Callback::from(move |id: TaskId| {
      state.dispatch(Event::Delete { id })
    })
  };

  let on_filter = {
    let state = state.clone();
    Callback::from(
      move |key: &'static str| {
        match key.parse::<Filter>() {
          | Ok(filter) => state.dispatch(
            Event::SelectFilter { filter }
          ),
          | Err(err) => tracing::warn!(
            error = %err,
            "ignoring filter selection"
          )
        }
      }
    )
  };

  let on_sort = {
    let state = state.clone();
    Callback::from(
      move |key: &'static str| {
        state.dispatch(
          Event::SelectSort {
            sort: SortMode::from_key(key)
          }
        )
      }
    )
  };

  let frame = state.frame();

  html! {
      <div class="container">
          <h1>{ "Docket" }</h1>
          <AddTaskForm
              text={(*draft_text).clone()}
              priority={*draft_priority}
              on_text={on_text}
              on_priority={on_priority}
              on_submit={on_submit}
          />
          <div class="controls">
              <SelectorBar
                  label="Show:"
                  button_class="filter-btn"
                  items={filter_items()}
                  active={frame.filter.as_key()}
                  on_select={on_filter}
              />
              <SelectorBar
                  label="Sort:"
                  button_class="sort-btn"
                  items={sort_items()}
                  active={frame.sort.as_key()}
                  on_select={on_sort}
              />
          </div>
          <TaskList
              body={frame.body.clone()}
              on_toggle={on_toggle}
              on_delete={on_delete}
          />
          <StatsBar counts={frame.counts} />
      </div>
  }
}
