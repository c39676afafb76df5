//! CLI response types returned by `pulse` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Record;

/// Outcome tag of an update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Success,
    Error,
}

/// Response from `pulse update`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct UpdateResponse {
    pub outcome: UpdateOutcome,
    pub message: String,
    /// The record as last seen before the update was submitted.
    pub record: Option<Record>,
}

/// Response from `pulse status`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub configured: bool,
    pub url: Option<String>,
    pub healthy: bool,
    pub version: Option<String>,
    pub error: Option<String>,
}
