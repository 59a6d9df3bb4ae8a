use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::{debug, trace};

use crate::controller::Event;
use crate::task::{Priority, TaskDraft, TaskId};
use crate::view::{Filter, SortMode, UnknownFilter};

/// Yields user events one at a time; `None` means the source is exhausted.
pub trait EventSource {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>>;
}

/// Pre-recorded events, mostly for driving a controller in tests.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    events: VecDeque<Event>,
}

impl From<Vec<Event>> for Replay {
    fn from(events: Vec<Event>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl EventSource for Replay {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        Ok(self.events.pop_front())
    }
}

pub const PROMPT_USAGE: &str = "commands: add [high|medium|low] <text>, toggle <id>, \
                                delete <id>, filter <all|active|completed>, \
                                sort <added|priority>, quit";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("'{0}' is not a task id")]
    BadId(String),
    #[error(transparent)]
    Filter(#[from] UnknownFilter),
}

/// Reads human commands line by line. Lines that do not parse produce a
/// hint on `hints` and are skipped.
pub struct PromptSource<R, H> {
    input: R,
    hints: H,
    line: usize,
}

impl<R: BufRead, H: Write> PromptSource<R, H> {
    pub fn new(input: R, hints: H) -> Self {
        Self {
            input,
            hints,
            line: 0,
        }
    }
}

impl<R: BufRead, H: Write> EventSource for PromptSource<R, H> {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let read = self
                .input
                .read_line(&mut buf)
                .context("failed to read command")?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            match parse_command(&buf) {
                Ok(Some(event)) => {
                    trace!(line = self.line, ?event, "parsed command");
                    return Ok(Some(event));
                }
                Ok(None) => continue,
                Err(err) => {
                    debug!(line = self.line, error = %err, "unparsable command");
                    writeln!(self.hints, "hint: {err}")?;
                    writeln!(self.hints, "{PROMPT_USAGE}")?;
                }
            }
        }
    }
}

/// Parses one prompt line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Event>, CommandError> {
    let line = line.trim();
    let Some((command, rest)) = line
        .split_once(char::is_whitespace)
        .map(|(cmd, rest)| (cmd, rest.trim()))
        .or_else(|| (!line.is_empty()).then_some((line, "")))
    else {
        return Ok(None);
    };

    let event = match command {
        "add" => Event::Submit(parse_add(rest)),
        "toggle" => Event::Toggle {
            id: parse_id("toggle", rest)?,
        },
        "delete" => Event::Delete {
            id: parse_id("delete", rest)?,
        },
        "filter" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "filter",
                    what: "all, active or completed",
                });
            }
            Event::SelectFilter {
                filter: rest.parse::<Filter>()?,
            }
        }
        "sort" => Event::SelectSort {
            sort: SortMode::from_key(rest),
        },
        "quit" => Event::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(event))
}

// The first word only counts as a priority when text follows it.
fn parse_add(rest: &str) -> TaskDraft {
    if let Some((first, text)) = rest.split_once(char::is_whitespace)
        && Priority::from_key(first).is_some()
    {
        return TaskDraft::new(text).with_priority(first);
    }
    TaskDraft::new(rest)
}

fn parse_id(command: &'static str, rest: &str) -> Result<TaskId, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            what: "a task id",
        });
    }
    rest.parse::<TaskId>()
        .map_err(|_| CommandError::BadId(rest.to_string()))
}

/// Reads JSON-lines events, e.g. `{"event":"toggle","id":1}`.
pub struct ScriptSource<R> {
    input: R,
    line: usize,
}

impl<R: BufRead> ScriptSource<R> {
    pub fn new(input: R) -> Self {
        Self { input, line: 0 }
    }
}

impl<R: BufRead> EventSource for ScriptSource<R> {
    fn next_event(&mut self) -> anyhow::Result<Option<Event>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let read = self
                .input
                .read_line(&mut buf)
                .context("failed to read script")?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            let event = serde_json::from_str::<Event>(trimmed)
                .with_context(|| format!("invalid event on script line {}", self.line))?;
            return Ok(Some(event));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn parses_add_with_and_without_priority() {
        assert_eq!(
            parse_command("add high Buy milk"),
            Ok(Some(Event::Submit(
                TaskDraft::new("Buy milk").with_priority("high")
            )))
        );
        assert_eq!(
            parse_command("add urgent stuff"),
            Ok(Some(Event::Submit(TaskDraft::new("urgent stuff"))))
        );
        assert_eq!(
            parse_command("add low"),
            Ok(Some(Event::Submit(TaskDraft::new("low"))))
        );
        assert_eq!(
            parse_command("add"),
            Ok(Some(Event::Submit(TaskDraft::new(""))))
        );
    }

    #[test]
    fn parses_row_and_selector_commands() {
        assert_eq!(
            parse_command("toggle 4"),
            Ok(Some(Event::Toggle { id: TaskId(4) }))
        );
        assert_eq!(
            parse_command("  delete 2  "),
            Ok(Some(Event::Delete { id: TaskId(2) }))
        );
        assert_eq!(
            parse_command("filter completed"),
            Ok(Some(Event::SelectFilter {
                filter: Filter::Completed
            }))
        );
        assert_eq!(
            parse_command("sort whatever"),
            Ok(Some(Event::SelectSort {
                sort: SortMode::Added
            }))
        );
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("quit"), Ok(Some(Event::Quit)));
    }

    #[test]
    fn rejects_bad_commands() {
        assert_eq!(
            parse_command("toggle x"),
            Err(CommandError::BadId("x".to_string()))
        );
        assert!(matches!(
            parse_command("delete"),
            Err(CommandError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_command("filter done"),
            Err(CommandError::Filter(_))
        ));
        assert_eq!(
            parse_command("frobnicate"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn only_documented_commands_are_accepted() {
        for line in ["load", "done 1", "rm 1", "exit"] {
            assert!(
                matches!(parse_command(line), Err(CommandError::Unknown(_))),
                "{line} should be unknown"
            );
        }
    }

    #[test]
    fn prompt_source_skips_bad_lines_with_a_hint() {
        let input = Cursor::new("nope\n\ntoggle 1\n");
        let mut hints = Vec::new();
        let mut source = PromptSource::new(input, &mut hints);

        assert_eq!(
            source.next_event().expect("read"),
            Some(Event::Toggle { id: TaskId(1) })
        );
        assert_eq!(source.next_event().expect("read"), None);

        let hints = String::from_utf8(hints).expect("utf8");
        assert!(hints.starts_with("hint: unknown command 'nope'\n"));
        assert!(hints.contains(PROMPT_USAGE));
    }

    #[test]
    fn script_source_reports_the_failing_line() {
        let input = Cursor::new("{\"event\":\"load\"}\n\n{\"event\":\"explode\"}\n");
        let mut source = ScriptSource::new(input);

        assert_eq!(source.next_event().expect("read"), Some(Event::Load));
        let err = source.next_event().expect_err("bad line");
        assert!(format!("{err:#}").contains("script line 3"));
    }

    #[test]
    fn replay_drains_in_order() {
        let mut source = Replay::from(vec![Event::Load, Event::Quit]);
        assert_eq!(source.next_event().expect("next"), Some(Event::Load));
        assert_eq!(source.next_event().expect("next"), Some(Event::Quit));
        assert_eq!(source.next_event().expect("next"), None);
    }
}
