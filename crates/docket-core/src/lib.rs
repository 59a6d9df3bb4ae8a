pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod render;
pub mod source;
pub mod store;
pub mod task;
pub mod view;

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use controller::{
  Controller,
  Event,
  Flow
};
pub use render::{
  Frame,
  Surface
};
pub use store::TaskStore;
pub use task::{
  Priority,
  Task,
  TaskDraft,
  TaskId
};
pub use view::{
  Filter,
  Session,
  SortMode
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args);
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting docket"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.docketrc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );
  if cli.no_seed {
    cfg.apply_overrides([(
      "seed".to_string(),
      "off".to_string()
    )]);
  }

  let surface =
    render::TextSurface::stdio(&cfg)?;

  match cli.script {
    | Some(path) => {
      let file = File::open(&path)
        .with_context(|| {
          format!(
            "failed to open script {}",
            path.display()
          )
        })?;
      let mut source =
        source::ScriptSource::new(
          BufReader::new(file)
        );
      run_session(
        &cfg,
        surface,
        &mut source
      )?;
    }
    | None => {
      let mut source =
        source::PromptSource::new(
          io::stdin().lock(),
          io::stderr()
        );
      run_session(
        &cfg,
        surface,
        &mut source
      )?;
    }
  }

  info!("done");
  Ok(())
}

/// Seeds the session once, then drains
/// `source` into a fresh controller.
#[tracing::instrument(skip_all)]
pub fn run_session<S, E>(
  cfg: &config::Config,
  surface: S,
  source: &mut E
) -> anyhow::Result<Controller<S>>
where
  S: Surface,
  E: source::EventSource
{
  let mut controller =
    Controller::from_config(
      cfg, surface
    )?;
  controller.dispatch(Event::Load)?;
  controller.run(source)?;
  Ok(controller)
}
