//! # pulse-store
//!
//! Access to the externally owned record table.
//!
//! Consumers depend on two seams rather than on a concrete backend:
//! - [`RecordSource`]: the live, push-style feed of full [`Snapshot`]s
//! - [`RecordWriter`]: the single patch mutation
//!
//! Implementations:
//! - [`MemoryStore`]: in-process table, both seams (tests, offline demos)
//! - [`BackendClient`]: HTTP function API of the hosted backend
//! - [`PollingSource`]: a [`RecordSource`] refreshed from any [`RecordReader`]
//!
//! [`Snapshot`]: pulse_core::snapshot::Snapshot

pub mod client;
pub mod error;
mod feed;
pub mod health;
mod http;
pub mod memory;
pub mod poller;
mod source;

pub use client::BackendClient;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use poller::PollingSource;
pub use source::{RecordReader, RecordSource, RecordWriter};
