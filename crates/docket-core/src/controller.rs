use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::INVALID_TASK_ALERT;
use crate::render::{Frame, Surface};
use crate::source::EventSource;
use crate::store::TaskStore;
use crate::task::{TaskDraft, TaskId};
use crate::view::{self, Filter, Session, SortMode};

/// One user-originated action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Load,
    Submit(TaskDraft),
    Toggle { id: TaskId },
    Delete { id: TaskId },
    #[serde(rename = "filter")]
    SelectFilter { filter: Filter },
    #[serde(rename = "sort")]
    SelectSort { sort: SortMode },
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub fn default_seed() -> Vec<TaskDraft> {
    vec![
        TaskDraft::new("Learn Rust fundamentals").with_priority("high"),
        TaskDraft::new("Build a simple project").with_priority("medium"),
        TaskDraft::new("Read about the ownership model").with_priority("low"),
    ]
}

/// Applies events to the store and session, then redraws the surface.
#[derive(Debug, Clone)]
pub struct Controller<S> {
    store: TaskStore,
    session: Session,
    surface: S,
    seed: Vec<TaskDraft>,
    loaded: bool,
}

impl<S: Surface> Controller<S> {
    pub fn new(surface: S) -> Self {
        Self {
            store: TaskStore::new(),
            session: Session::default(),
            surface,
            seed: default_seed(),
            loaded: false,
        }
    }

    pub fn from_config(cfg: &Config, surface: S) -> anyhow::Result<Self> {
        let seed_enabled = cfg.get_bool("seed")?.unwrap_or(true);
        debug!(seed_enabled, "building controller");

        let controller = Self::new(surface);
        Ok(if seed_enabled {
            controller
        } else {
            controller.with_seed(vec![])
        })
    }

    pub fn with_seed(mut self, seed: Vec<TaskDraft>) -> Self {
        self.seed = seed;
        self
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Current frame, derived from scratch.
    pub fn frame(&self) -> Frame {
        Frame::compose(&view::derive(self.store.all(), self.session), self.session)
    }

    #[instrument(skip(self), fields(tasks = self.store.len()))]
    pub fn dispatch(&mut self, event: Event) -> anyhow::Result<Flow> {
        match event {
            // Seeds once per session; a repeated load only redraws.
            Event::Load if self.loaded => debug!("already loaded, redrawing only"),
            Event::Load => {
                self.loaded = true;
                let seed = self.seed.clone();
                info!(count = seed.len(), "seeding example tasks");
                for draft in seed {
                    self.submit(draft)?;
                }
            }
            Event::Submit(draft) => self.submit(draft)?,
            Event::Toggle { id } => {
                self.store.toggle_completion(id);
            }
            Event::Delete { id } => {
                self.store.remove(id);
            }
            Event::SelectFilter { filter } => {
                debug!(%filter, "filter selected");
                self.session.filter = filter;
            }
            Event::SelectSort { sort } => {
                debug!(%sort, "sort selected");
                self.session.sort = sort;
            }
            Event::Quit => {
                info!("quit requested");
                return Ok(Flow::Stop);
            }
        }

        self.redraw()?;
        Ok(Flow::Continue)
    }

    #[instrument(skip_all)]
    pub fn run<E: EventSource>(&mut self, source: &mut E) -> anyhow::Result<()> {
        let mut handled = 0usize;
        while let Some(event) = source.next_event()? {
            handled += 1;
            if self.dispatch(event)? == Flow::Stop {
                break;
            }
        }
        info!(handled, "event source drained");
        Ok(())
    }

    fn submit(&mut self, draft: TaskDraft) -> anyhow::Result<()> {
        match self.store.add(draft) {
            Ok(_) => self.surface.reset_input(),
            Err(err) => {
                warn!(error = %err, "task rejected");
                self.surface.alert(INVALID_TASK_ALERT)
            }
        }
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let frame = self.frame();
        self.surface.draw(&frame)
    }
}
