//! Change notifications published by the store
//! Location: src/store/events.rs

use super::snapshot::DeviceId;
use crate::synth::WaveformKind;

/// One change to the store, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    Added {
        device_id: DeviceId,
    },
    /// A device's snapshot advanced by one tick
    Ticked {
        device_id: DeviceId,
        sequence: u64,
        regenerated: Vec<WaveformKind>,
    },
    Updated {
        device_id: DeviceId,
    },
    Removed {
        device_id: DeviceId,
    },
}

impl StoreEvent {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            StoreEvent::Added { device_id }
            | StoreEvent::Ticked { device_id, .. }
            | StoreEvent::Updated { device_id }
            | StoreEvent::Removed { device_id } => device_id,
        }
    }

    pub fn is_for(&self, id: &str) -> bool {
        self.device_id().as_str() == id
    }
}
