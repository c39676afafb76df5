use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// One row of the managed record table.
///
/// `name` and `value` are mutable only through a [`RecordPatch`](crate::patch::RecordPatch).
/// `description` and `created_at` are never written by this system.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub value: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record {
    /// The value as it appears in an editable text field.
    #[must_use]
    pub fn value_text(&self) -> String {
        format_value(self.value)
    }
}

/// Render a number the way a text input shows it: integral values carry no
/// fractional part (`100`, not `100.0`).
///
/// Output is always positional, never exponent notation: `1e21` renders as
/// `1000000000000000000000` and `1e-7` as `0.0000001`. Both parse back to the
/// same `f64`.
#[must_use]
pub fn format_value(value: f64) -> String {
    value.to_string()
}
