//! Common utilities
//!
//! Clock injection for the monitor header and timer formatting.

pub mod time;

pub use time::{
    current_timestamp_nanos,
    format_clock,
    format_elapsed,
    MockTimeProvider,
    SystemTimeProvider,
    TimeProvider,
};
