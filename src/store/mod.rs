// src/store/mod.rs
//! Vital-sign state store
//!
//! Each registered device owns a [`VitalSignsSnapshot`] and, in background
//! mode, a Tokio ticker that evolves it every tick interval. Changes are
//! published as [`StoreEvent`]s on a broadcast channel.

pub mod events;
pub mod evolution;
pub mod regeneration;
pub mod service;
pub mod snapshot;

pub use events::StoreEvent;
pub use evolution::{add_variation, evolve, seed_snapshot};
pub use regeneration::RegenerationTable;
pub use service::{TickMode, VitalSignsStore};
pub use snapshot::{DeviceId, Nibp, VitalSignsSnapshot, VitalSignsUpdate};
