use std::io::{self, IsTerminal, Stderr, Stdout, Write};

use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::task::{Priority, Task, TaskId};
use crate::view::{Counts, Filter, Session, SortMode, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    NoTasks,
    NoActive,
    NoCompleted,
    NoneFound,
}

impl Placeholder {
    /// Picks the message for a filtered view that came out empty while the
    /// store itself still holds tasks.
    pub fn for_filter(filter: Filter) -> Self {
        match filter {
            Filter::Active => Placeholder::NoActive,
            Filter::Completed => Placeholder::NoCompleted,
            Filter::All => Placeholder::NoneFound,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Placeholder::NoTasks => "No tasks yet. Add a task to get started!",
            Placeholder::NoActive => "No active tasks!",
            Placeholder::NoCompleted => "No completed tasks yet!",
            Placeholder::NoneFound => "No tasks found!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
}

impl From<&Task> for Row {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            priority: task.priority,
            completed: task.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty(Placeholder),
    Rows(Vec<Row>),
}

/// Everything a surface needs to draw one state of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub body: Body,
    pub counts: Counts,
    pub filter: Filter,
    pub sort: SortMode,
}

impl Frame {
    pub fn compose(view: &View<'_>, session: Session) -> Self {
        let body = if view.store_is_empty() {
            Body::Empty(Placeholder::NoTasks)
        } else if view.tasks.is_empty() {
            Body::Empty(Placeholder::for_filter(session.filter))
        } else {
            Body::Rows(view.tasks.iter().map(|task| Row::from(*task)).collect())
        };

        Self {
            body,
            counts: view.counts,
            filter: session.filter,
            sort: session.sort,
        }
    }

    pub fn rows(&self) -> &[Row] {
        match &self.body {
            Body::Rows(rows) => rows,
            Body::Empty(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        match self.body {
            Body::Empty(placeholder) => Some(placeholder),
            Body::Rows(_) => None,
        }
    }
}

/// A display the controller draws into.
pub trait Surface {
    fn draw(&mut self, frame: &Frame) -> anyhow::Result<()>;

    /// Blocking notification; the caller does not continue until it returns.
    fn alert(&mut self, message: &str) -> anyhow::Result<()>;

    /// A submitted task was accepted: clear the text field and put the
    /// priority selector back on medium.
    fn reset_input(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Keeps every frame and alert in memory instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub frames: Vec<Frame>,
    pub alerts: Vec<String>,
    pub input_resets: usize,
}

impl RecordingSurface {
    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, frame: &Frame) -> anyhow::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn alert(&mut self, message: &str) -> anyhow::Result<()> {
        self.alerts.push(message.to_string());
        Ok(())
    }

    fn reset_input(&mut self) -> anyhow::Result<()> {
        self.input_resets += 1;
        Ok(())
    }
}

/// Draws frames as a plain table; alerts go to a separate writer.
#[derive(Debug)]
pub struct TextSurface<W, E> {
    out: W,
    err: E,
    color: bool,
}

impl TextSurface<Stdout, Stderr> {
    pub fn stdio(cfg: &Config) -> anyhow::Result<Self> {
        let color = cfg.get_bool("color")?.unwrap_or(true) && io::stdout().is_terminal();
        Ok(Self::new(io::stdout(), io::stderr(), color))
    }
}

impl<W: Write, E: Write> TextSurface<W, E> {
    pub fn new(out: W, err: E, color: bool) -> Self {
        Self { out, err, color }
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }

    fn priority_cell(&self, priority: Priority) -> String {
        let code = match priority {
            Priority::High => "31",
            Priority::Medium => "33",
            Priority::Low => "32",
        };
        self.paint(priority.label(), code)
    }
}

impl<W: Write, E: Write> Surface for TextSurface<W, E> {
    #[tracing::instrument(skip_all, fields(rows = frame.rows().len()))]
    fn draw(&mut self, frame: &Frame) -> anyhow::Result<()> {
        let filters = selector_bar(
            Filter::ALL.iter().map(|f| (f.label(), *f == frame.filter)),
        );
        let sorts = selector_bar(
            SortMode::ALL.iter().map(|s| (s.label(), *s == frame.sort)),
        );

        writeln!(self.out, "filter: {filters}    sort: {sorts}")?;
        match &frame.body {
            Body::Empty(placeholder) => writeln!(self.out, "  {}", placeholder.message())?,
            Body::Rows(rows) => {
                let cells = rows
                    .iter()
                    .map(|row| {
                        vec![
                            self.paint(&row.id.to_string(), "36"),
                            if row.completed { "[x]" } else { "[ ]" }.to_string(),
                            self.priority_cell(row.priority),
                            row.text.clone(),
                        ]
                    })
                    .collect::<Vec<_>>();
                let headers = ["ID", "Done", "Priority", "Task"]
                    .map(str::to_string)
                    .to_vec();
                write_table(&mut self.out, headers, cells)?;
            }
        }
        writeln!(
            self.out,
            "total {} · active {} · completed {}",
            frame.counts.total, frame.counts.active, frame.counts.completed
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn alert(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.err, "alert: {message}")?;
        self.err.flush()?;
        Ok(())
    }
}

fn selector_bar<'a>(items: impl Iterator<Item = (&'a str, bool)>) -> String {
    items
        .map(|(label, active)| {
            if active {
                format!("[{label}]")
            } else {
                label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::view::derive;

    fn sample(completed: bool) -> Vec<Task> {
        vec![Task {
            id: TaskId(1),
            text: "Buy milk".to_string(),
            priority: Priority::High,
            completed,
            created_at: Utc::now(),
        }]
    }

    #[test]
    fn empty_store_gets_the_no_tasks_placeholder() {
        let session = Session {
            filter: Filter::Completed,
            ..Session::default()
        };
        let frame = Frame::compose(&derive(&[], session), session);
        assert_eq!(frame.placeholder(), Some(Placeholder::NoTasks));
        assert!(frame.rows().is_empty());
        assert_eq!(frame.counts, Counts::default());
    }

    #[test]
    fn empty_filter_result_gets_a_filter_placeholder() {
        let tasks = sample(false);
        let session = Session {
            filter: Filter::Completed,
            ..Session::default()
        };
        let frame = Frame::compose(&derive(&tasks, session), session);
        assert_eq!(frame.placeholder(), Some(Placeholder::NoCompleted));
        assert_eq!(frame.counts.total, 1);
        assert_eq!(frame.counts.active, 1);

        let tasks = sample(true);
        let session = Session {
            filter: Filter::Active,
            ..Session::default()
        };
        let frame = Frame::compose(&derive(&tasks, session), session);
        assert_eq!(frame.placeholder(), Some(Placeholder::NoActive));
    }

    #[test]
    fn rows_carry_task_ids() {
        let tasks = sample(true);
        let frame = Frame::compose(&derive(&tasks, Session::default()), Session::default());
        assert_eq!(
            frame.rows(),
            &[Row {
                id: TaskId(1),
                text: "Buy milk".to_string(),
                priority: Priority::High,
                completed: true,
            }]
        );
    }

    #[test]
    fn text_surface_draws_table_bars_and_counters() {
        let tasks = sample(false);
        let frame = Frame::compose(&derive(&tasks, Session::default()), Session::default());

        let mut surface = TextSurface::new(Vec::new(), Vec::new(), false);
        surface.draw(&frame).expect("draw");
        surface.alert("Please enter a valid task!").expect("alert");
        let (out, err) = surface.into_inner();
        let out = String::from_utf8(out).expect("utf8");
        let err = String::from_utf8(err).expect("utf8");

        assert!(out.starts_with("filter: [All] Active Completed    sort: [Date Added] Priority"));
        assert!(out.contains("ID Done Priority Task"));
        assert!(out.contains("1  [ ]  High     Buy milk"));
        assert!(out.contains("total 1 · active 1 · completed 0"));
        assert_eq!(err, "alert: Please enter a valid task!\n");
    }

    #[test]
    fn stdio_surface_accepts_every_config_boolean_word() {
        for word in ["y", "n", "yes", "off", "1", "false"] {
            let mut cfg = Config::default();
            cfg.apply_overrides(vec![("color".to_string(), word.to_string())]);
            assert!(TextSurface::stdio(&cfg).is_ok(), "color = {word}");
        }

        let mut cfg = Config::default();
        cfg.apply_overrides(vec![("color".to_string(), "sometimes".to_string())]);
        assert!(TextSurface::stdio(&cfg).is_err());
    }

    #[test]
    fn text_surface_prints_placeholder_when_empty() {
        let frame = Frame::compose(&derive(&[], Session::default()), Session::default());
        let mut surface = TextSurface::new(Vec::new(), Vec::new(), false);
        surface.draw(&frame).expect("draw");
        let (out, _) = surface.into_inner();
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("No tasks yet. Add a task to get started!"));
        assert!(out.contains("total 0 · active 0 · completed 0"));
    }
}
