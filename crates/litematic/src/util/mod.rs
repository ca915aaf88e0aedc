//! Utility modules.

pub mod time;

pub use time::{format_millis_rfc3339, now_millis};
