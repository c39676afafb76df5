//! # pulse-core
//!
//! Core types shared across all Pulse crates:
//! - The [`Record`](entities::Record) entity and its opaque [`RecordId`](ids::RecordId)
//! - [`Snapshot`](snapshot::Snapshot), the pending-vs-available record feed state
//! - [`RecordPatch`](patch::RecordPatch), the arguments of the single write operation
//! - Cross-cutting error types
//! - CLI response types

pub mod entities;
pub mod errors;
pub mod ids;
pub mod patch;
pub mod responses;
pub mod snapshot;
