// src/playback/mod.rs
//! Recorded-case playback
//!
//! A [`RecordedCase`] holds time-stamped scalar vitals, either a bare row
//! array or a case data response with `data` and `meta`. A [`CasePlayer`]
//! walks through it at its own interval, looks up the row nearest to each
//! position and pushes the values into a [`VitalSignsStore`] device until
//! the end of the case.
//!
//! [`VitalSignsStore`]: crate::store::VitalSignsStore

pub mod case;
pub mod player;

pub use case::{CasePoint, RecordedCase, TimeRange, VitalSignal};
pub use player::{CasePlayer, PlaybackSummary, StopReason};
