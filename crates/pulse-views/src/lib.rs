//! # pulse-views
//!
//! The two consumers of the record feed:
//! - [`display`]: read-only projection of a [`Snapshot`] into rows
//! - [`form`]: the Update Form's synchronous state machine
//! - [`update_form`]: the async driver that wires the form to a feed, a
//!   writer, and the success-message timer
//!
//! Both views share the three-way loading contract of
//! [`LoadState`](pulse_core::snapshot::LoadState): a pending feed renders a
//! loading indicator, an empty delivery renders an empty-state message.
//!
//! [`Snapshot`]: pulse_core::snapshot::Snapshot

pub mod display;
pub mod form;
pub mod update_form;

pub use display::{DisplayOptions, DisplayState, DisplayView, RecordRow};
pub use form::{FormState, FormView, Message, SubmitOutcome, Submission, ValidationError};
pub use update_form::UpdateForm;

/// Shown by both views while the feed is pending.
pub const LOADING_MESSAGE: &str = "Loading records...";
