use std::fmt;

use chrono::{DateTime, Local};
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTag {
    Add,
    Power,
    Theme,
    Click,
    Save,
    Db,
}

impl EventTag {
    pub fn as_str(self) -> &'static str {
        match self {
            EventTag::Add => "ADD",
            EventTag::Power => "POWER",
            EventTag::Theme => "THEME",
            EventTag::Click => "CLICK",
            EventTag::Save => "SAVE",
            EventTag::Db => "DB",
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub tag: EventTag,
    pub detail: String,
}

/// Append-only record of what happened in this session. Lives only in memory.
#[derive(Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn push(&mut self, tag: EventTag, detail: impl Into<String>) {
        let detail = detail.into();
        info!(event = %tag, "{detail}");
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            tag,
            detail,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn count_tagged(&self, tag: EventTag) -> usize {
        self.entries.iter().filter(|e| e.tag == tag).count()
    }
}
