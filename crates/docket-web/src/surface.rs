use std::rc::Rc;

use docket_core::{
  Controller,
  Event,
  Frame,
  Surface
};
use yew::Reducible;

/// Holds the latest frame for the view
/// layer. Alerts and input resets are
/// bumped as sequence numbers so the
/// app can react to them in effects.
#[derive(Debug, Clone, Default)]
pub struct WebSurface {
  pub frame:       Option<Frame>,
  pub alert:       Option<String>,
  pub alert_seq:   u64,
  pub input_epoch: u64
}

impl Surface for WebSurface {
  fn draw(
    &mut self,
    frame: &Frame
  ) -> anyhow::Result<()> {
    self.frame = Some(frame.clone());
    Ok(())
  }

  fn alert(
    &mut self,
    message: &str
  ) -> anyhow::Result<()> {
    self.alert =
      Some(message.to_string());
    self.alert_seq += 1;
    Ok(())
  }

  fn reset_input(
    &mut self
  ) -> anyhow::Result<()> {
    self.input_epoch += 1;
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct BrowserState {
  controller: Controller<WebSurface>
}

impl Default for BrowserState {
  fn default() -> Self {
    Self {
      controller: Controller::new(
        WebSurface::default()
      )
    }
  }
}

impl BrowserState {
  pub fn surface(&self) -> &WebSurface {
    self.controller.surface()
  }

  pub fn frame(&self) -> Frame {
    self
      .surface()
      .frame
      .clone()
      .unwrap_or_else(|| {
        self.controller.frame()
      })
  }
}

impl Reducible for BrowserState {
  type Action = Event;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    if let Err(err) =
      next.controller.dispatch(action)
    {
      tracing::error!(
        error = %format!("{err:#}"),
        "event dispatch failed"
      );
      return self;
    }
    Rc::new(next)
  }
}

#[cfg(test)]
mod tests {
  use docket_core::{
    Filter,
    TaskDraft
  };

  use super::*;

  fn reduce(
    state: Rc<BrowserState>,
    event: Event
  ) -> Rc<BrowserState> {
    state.reduce(event)
  }

  #[test]
  fn load_then_submit_updates_frame_and_epoch()
  {
    let state =
      Rc::new(BrowserState::default());
    let state = reduce(state, Event::Load);
    assert_eq!(state.frame().rows().len(), 3);
    assert_eq!(
      state.surface().input_epoch,
      3
    );

    let state = reduce(
      state,
      Event::Submit(TaskDraft::new(
        "Water plants"
      ))
    );
    assert_eq!(state.frame().rows().len(), 4);
    assert_eq!(
      state.surface().input_epoch,
      4
    );
    assert_eq!(
      state.surface().alert_seq,
      0
    );
  }

  #[test]
  fn blank_submit_raises_alert_without_reset()
  {
    let state =
      Rc::new(BrowserState::default());
    let state = reduce(
      state,
      Event::Submit(TaskDraft::new("   "))
    );
    assert_eq!(
      state.surface().alert_seq,
      1
    );
    assert_eq!(
      state.surface().alert.as_deref(),
      Some("Please enter a valid task!")
    );
    assert_eq!(
      state.surface().input_epoch,
      0
    );
  }

  #[test]
  fn failed_submit_commits_the_same_frame_alongside_the_alert()
  {
    let loaded = reduce(
      Rc::new(BrowserState::default()),
      Event::Load
    );
    let before = loaded.frame();

    let state = reduce(
      loaded,
      Event::Submit(TaskDraft::default())
    );
    assert_eq!(state.frame(), before);
    assert_eq!(
      state.surface().alert_seq,
      1
    );
    assert_eq!(
      state.surface().input_epoch,
      3
    );
  }

  #[test]
  fn filter_selection_is_reflected_in_frame()
  {
    let state =
      Rc::new(BrowserState::default());
    let state = reduce(
      state,
      Event::SelectFilter {
        filter: Filter::Active
      }
    );
    assert_eq!(
      state.frame().filter,
      Filter::Active
    );
  }
}
