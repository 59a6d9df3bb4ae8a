use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}', expected all, active or completed")]
pub struct UnknownFilter(pub String);

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_key(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }
}

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_key() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Ordering applied before filtering. Unrecognized keys fall back to
/// [`SortMode::Added`], so decoding a sort selection never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    #[default]
    Added,
    Priority,
}

impl SortMode {
    pub const ALL: [SortMode; 2] = [SortMode::Added, SortMode::Priority];

    pub fn from_key(key: &str) -> Self {
        match key {
            "priority" => SortMode::Priority,
            _ => SortMode::Added,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            SortMode::Added => "added",
            SortMode::Priority => "priority",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Added => "Date Added",
            SortMode::Priority => "Priority",
        }
    }

    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortMode::Priority => b.priority.rank().cmp(&a.priority.rank()),
            // Ids break ties between tasks created within the same tick.
            SortMode::Added => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl Serialize for SortMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_key())
    }
}

impl<'de> Deserialize<'de> for SortMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(key) => Ok(SortMode::from_key(&key)),
            _ => Ok(SortMode::Added),
        }
    }
}

/// Current filter and sort selection for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub filter: Filter,
    pub sort: SortMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            active: total - completed,
            completed,
        }
    }
}

/// Derived, display-ordered subset of the store. Counts always cover the
/// full collection regardless of the filter.
#[derive(Debug, Clone)]
pub struct View<'a> {
    pub tasks: Vec<&'a Task>,
    pub counts: Counts,
}

impl View<'_> {
    pub fn store_is_empty(&self) -> bool {
        self.counts.total == 0
    }
}

pub fn derive(tasks: &[Task], session: Session) -> View<'_> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| session.sort.compare(a, b));
    ordered.retain(|task| session.filter.matches(task));

    View {
        tasks: ordered,
        counts: Counts::of(tasks),
    }
}
