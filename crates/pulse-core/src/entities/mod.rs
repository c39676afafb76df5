//! Entity structs for Pulse domain objects.
//!
//! The backend owns one table. Its rows map to [`Record`].

mod record;

pub use record::{Record, format_value};
