//! Display View: a pure projection of the record feed.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};
use pulse_config::DisplayConfig;
use pulse_core::entities::Record;
use pulse_core::ids::RecordId;
use pulse_core::snapshot::{LoadState, Snapshot};
use serde::Serialize;

use crate::LOADING_MESSAGE;

/// Empty-state wording of the Display View.
pub const EMPTY_MESSAGE: &str = "No records found. Seed the table to add sample data.";

/// Rendered in place of an absent description.
pub const DESCRIPTION_PLACEHOLDER: &str = "No description";

/// How creation timestamps are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub time_format: String,
    pub utc: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DisplayOptions {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            time_format: config.time_format.clone(),
            utc: config.utc,
        }
    }
}

impl DisplayOptions {
    /// Falls back to RFC 3339 when `time_format` is not a valid strftime pattern.
    fn format_time(&self, at: DateTime<Utc>) -> String {
        let mut out = String::new();
        let written = if self.utc {
            write!(out, "{}", at.format(&self.time_format))
        } else {
            write!(
                out,
                "{}",
                at.with_timezone(&Local).format(&self.time_format)
            )
        };
        match written {
            Ok(()) => out,
            Err(_) => at.to_rfc3339(),
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordRow {
    pub id: RecordId,
    pub name: String,
    pub value: String,
    pub description: String,
    pub created_at: String,
}

/// What the Display View shows for a given feed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    Loading { message: &'static str },
    Empty { message: &'static str },
    Populated { rows: Vec<RecordRow> },
}

#[derive(Debug, Clone, Default)]
pub struct DisplayView {
    options: DisplayOptions,
}

impl DisplayView {
    #[must_use]
    pub const fn new(options: DisplayOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn project(&self, snapshot: &Snapshot) -> DisplayState {
        match snapshot.load_state() {
            LoadState::Loading => DisplayState::Loading {
                message: LOADING_MESSAGE,
            },
            LoadState::Empty => DisplayState::Empty {
                message: EMPTY_MESSAGE,
            },
            LoadState::Populated(records) => DisplayState::Populated {
                rows: records.iter().map(|r| self.row(r)).collect(),
            },
        }
    }

    fn row(&self, record: &Record) -> RecordRow {
        RecordRow {
            id: record.id.clone(),
            name: record.name.clone(),
            value: record.value_text(),
            description: record
                .description
                .clone()
                .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
            created_at: self.options.format_time(record.created_at),
        }
    }
}
