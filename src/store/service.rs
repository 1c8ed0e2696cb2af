//! Vital-sign state store: one snapshot and one ticker per device
//! Location: src/store/service.rs

use super::evolution::{evolve, seed_snapshot};
use super::events::StoreEvent;
use super::regeneration::RegenerationTable;
use super::snapshot::{DeviceId, VitalSignsSnapshot, VitalSignsUpdate};
use crate::config::StoreConfig;
use crate::error::{Result, VitalsError};
use crate::synth::WaveformSynthesizer;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How device snapshots are advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// Each device gets a Tokio task ticking at the configured interval
    Background,
    /// Nothing ticks unless [`VitalSignsStore::tick`] is called
    Manual,
}

struct DeviceEntry {
    snapshot: VitalSignsSnapshot,
    synth: WaveformSynthesizer,
    sequence: u64,
    /// Registration number; a re-added id gets a new one
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Drop for DeviceEntry {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

struct StoreShared {
    devices: RwLock<HashMap<DeviceId, DeviceEntry>>,
    events: broadcast::Sender<StoreEvent>,
    seeds: Mutex<StdRng>,
    regeneration: RegenerationTable,
    next_generation: AtomicU64,
}

impl StoreShared {
    fn publish(&self, event: StoreEvent) {
        // No subscribers is the common case and not an error.
        let _ = self.events.send(event);
    }

    /// Tick one device; with `generation` set, only the registration it names
    fn tick_device(&self, id: &str, generation: Option<u64>) -> bool {
        let event = {
            let mut devices = self.devices.write();
            let Some(entry) = devices.get_mut(id) else {
                return false;
            };
            if generation.is_some_and(|g| g != entry.generation) {
                debug!(device = id, "stale ticker skipped");
                return false;
            }
            let regenerated = evolve(&mut entry.snapshot, &mut entry.synth, &self.regeneration);
            entry.sequence += 1;
            if !regenerated.is_empty() {
                debug!(device = id, sequence = entry.sequence, ?regenerated, "regenerated waveforms");
            }
            StoreEvent::Ticked {
                device_id: DeviceId::from(id),
                sequence: entry.sequence,
                regenerated,
            }
        };
        self.publish(event);
        true
    }
}

/// Registry of simulated devices
///
/// Owns every device's snapshot and ticker. Dropping the store, or calling
/// [`shutdown`](Self::shutdown), stops all tickers.
pub struct VitalSignsStore {
    shared: Arc<StoreShared>,
    tick_interval: Duration,
    mode: TickMode,
}

impl VitalSignsStore {
    /// Store whose devices tick on background Tokio tasks
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::with_mode(config, TickMode::Background)
    }

    /// Store advanced only by explicit [`tick`](Self::tick) calls
    pub fn new_manual(config: StoreConfig) -> Result<Self> {
        Self::with_mode(config, TickMode::Manual)
    }

    pub fn with_mode(config: StoreConfig, mode: TickMode) -> Result<Self> {
        config.validate()?;
        let seeds = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(config.event_capacity);

        Ok(Self {
            shared: Arc::new(StoreShared {
                devices: RwLock::new(HashMap::new()),
                events,
                seeds: Mutex::new(seeds),
                regeneration: config.regeneration,
                next_generation: AtomicU64::new(0),
            }),
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            mode,
        })
    }

    pub fn mode(&self) -> TickMode {
        self.mode
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Register a device; returns `false` if it was already registered
    ///
    /// An existing device keeps its snapshot and ticker untouched.
    pub fn add_device(&self, id: impl Into<DeviceId>) -> Result<bool> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(VitalsError::invalid_device(id.as_str(), "device id must not be empty"));
        }
        let runtime = match self.mode {
            TickMode::Background => Some(tokio::runtime::Handle::try_current().map_err(|e| {
                VitalsError::runtime(format!("cannot start ticker for '{}': {}", id, e))
            })?),
            TickMode::Manual => None,
        };

        {
            let mut devices = self.shared.devices.write();
            if devices.contains_key(id.as_str()) {
                debug!(device = %id, "device already registered");
                return Ok(false);
            }

            let seed = self.shared.seeds.lock().gen::<u64>();
            let mut synth = WaveformSynthesizer::new(seed);
            let snapshot = seed_snapshot(&mut synth);
            let generation = self.shared.next_generation.fetch_add(1, Ordering::Relaxed);
            let ticker = runtime.map(|handle| self.spawn_ticker(&handle, id.clone(), generation));

            devices.insert(
                id.clone(),
                DeviceEntry {
                    snapshot,
                    synth,
                    sequence: 0,
                    generation,
                    ticker,
                },
            );
        }

        info!(device = %id, interval_ms = self.tick_interval.as_millis() as u64, "device added");
        self.shared.publish(StoreEvent::Added { device_id: id });
        Ok(true)
    }

    fn spawn_ticker(&self, handle: &tokio::runtime::Handle, id: DeviceId, generation: u64) -> JoinHandle<()> {
        let shared: Weak<StoreShared> = Arc::downgrade(&self.shared);
        let period = self.tick_interval;

        handle.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                if !shared.tick_device(id.as_str(), Some(generation)) {
                    break;
                }
            }
        })
    }

    /// Unregister a device and stop its ticker; returns `false` if absent
    pub fn remove_device(&self, id: &str) -> bool {
        let removed = self.shared.devices.write().remove(id);
        match removed {
            Some(entry) => {
                drop(entry);
                info!(device = id, "device removed");
                self.shared.publish(StoreEvent::Removed {
                    device_id: DeviceId::from(id),
                });
                true
            }
            None => false,
        }
    }

    /// Shallow-merge a partial update; returns `false` if the device is unknown
    pub fn update_vital_signs(&self, id: &str, update: VitalSignsUpdate) -> bool {
        {
            let mut devices = self.shared.devices.write();
            let Some(entry) = devices.get_mut(id) else {
                warn!(device = id, "ignoring update for unregistered device");
                return false;
            };
            entry.snapshot.apply(update);
        }
        self.shared.publish(StoreEvent::Updated {
            device_id: DeviceId::from(id),
        });
        true
    }

    /// Advance one device by a single tick
    pub fn tick(&self, id: &str) -> bool {
        self.shared.tick_device(id, None)
    }

    /// Advance every registered device by a single tick
    pub fn tick_all(&self) -> usize {
        self.device_ids()
            .iter()
            .filter(|id| self.shared.tick_device(id.as_str(), None))
            .count()
    }

    pub fn snapshot(&self, id: &str) -> Option<VitalSignsSnapshot> {
        self.shared.devices.read().get(id).map(|e| e.snapshot.clone())
    }

    /// Borrow a snapshot without cloning its waveform buffers
    pub fn with_snapshot<T>(&self, id: &str, f: impl FnOnce(&VitalSignsSnapshot) -> T) -> Option<T> {
        self.shared.devices.read().get(id).map(|e| f(&e.snapshot))
    }

    /// Number of ticks applied to a device since it was added
    pub fn tick_count(&self, id: &str) -> Option<u64> {
        self.shared.devices.read().get(id).map(|e| e.sequence)
    }

    /// Registered ids in sorted order
    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<DeviceId> = self.shared.devices.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shared.devices.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.shared.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of devices that currently own a running ticker
    pub fn active_tickers(&self) -> usize {
        self.shared
            .devices
            .read()
            .values()
            .filter(|e| e.ticker.as_ref().is_some_and(|t| !t.is_finished()))
            .count()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.shared.events.subscribe()
    }

    /// Remove every device, stopping all tickers
    pub fn shutdown(&self) {
        let drained: Vec<DeviceId> = {
            let mut devices = self.shared.devices.write();
            devices.drain().map(|(id, _entry)| id).collect()
        };
        for id in &drained {
            self.shared.publish(StoreEvent::Removed { device_id: id.clone() });
        }
        info!(devices = drained.len(), "store shut down");
    }
}

impl Drop for VitalSignsStore {
    fn drop(&mut self) {
        self.shared.devices.write().clear();
    }
}

impl std::fmt::Debug for VitalSignsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VitalSignsStore")
            .field("devices", &self.device_ids())
            .field("tick_interval", &self.tick_interval)
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::bounds;

    fn seeded() -> StoreConfig {
        StoreConfig {
            seed: Some(17),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        assert!(store.add_device("OR01").unwrap());
        store.tick("OR01");
        store.tick("OR01");
        let before = store.snapshot("OR01").unwrap();

        assert!(!store.add_device("OR01").unwrap());
        assert_eq!(store.snapshot("OR01").unwrap(), before);
        assert_eq!(store.tick_count("OR01"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fresh_snapshot_within_bounds() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        store.add_device("ICU1").unwrap();
        let snap = store.snapshot("ICU1").unwrap();
        assert!((bounds::SPO2.0..=bounds::SPO2.1).contains(&snap.spo2));
        assert!((bounds::BIS.0..=bounds::BIS.1).contains(&snap.bis));
        assert!(snap.has_waveforms());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        store.add_device("OR02").unwrap();
        assert!(store.remove_device("OR02"));
        assert!(!store.remove_device("OR02"));
        assert!(store.snapshot("OR02").is_none());
        assert!(!store.tick("OR02"));
    }

    #[test]
    fn test_stale_ticker_cannot_tick_readded_device() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        store.add_device("OR02").unwrap();
        let old = store.shared.devices.read()["OR02"].generation;
        store.remove_device("OR02");
        store.add_device("OR02").unwrap();
        let current = store.shared.devices.read()["OR02"].generation;
        assert_ne!(old, current);

        assert!(!store.shared.tick_device("OR02", Some(old)));
        assert_eq!(store.tick_count("OR02"), Some(0));
        assert!(store.shared.tick_device("OR02", Some(current)));
        assert_eq!(store.tick_count("OR02"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_readded_device_has_one_ticker() {
        let store = VitalSignsStore::new(seeded()).unwrap();
        store.add_device("OR04").unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.remove_device("OR04");
        store.add_device("OR04").unwrap();
        tokio::time::sleep(Duration::from_millis(205)).await;
        let ticks = store.tick_count("OR04").unwrap();
        assert!((4..=5).contains(&ticks), "ticks = {}", ticks);
    }

    #[test]
    fn test_update_unknown_device_is_noop() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        let update = VitalSignsUpdate {
            hr: Some(80.0),
            ..Default::default()
        };
        assert!(!store.update_vital_signs("ghost", update));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_merges() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        store.add_device("OR03").unwrap();
        let spo2 = store.snapshot("OR03").unwrap().spo2;
        assert!(store.update_vital_signs(
            "OR03",
            VitalSignsUpdate {
                hr: Some(101.0),
                ..Default::default()
            }
        ));
        let snap = store.snapshot("OR03").unwrap();
        assert_eq!(snap.hr, 101.0);
        assert_eq!(snap.spo2, spo2);
    }

    #[test]
    fn test_same_seed_reproduces_devices() {
        let a = VitalSignsStore::new_manual(seeded()).unwrap();
        let b = VitalSignsStore::new_manual(seeded()).unwrap();
        for store in [&a, &b] {
            store.add_device("d1").unwrap();
            store.add_device("d2").unwrap();
            for _ in 0..10 {
                store.tick_all();
            }
        }
        assert_eq!(a.snapshot("d1"), b.snapshot("d1"));
        assert_eq!(a.snapshot("d2"), b.snapshot("d2"));
        assert_ne!(a.snapshot("d1").unwrap().ecg, a.snapshot("d2").unwrap().ecg);
    }

    #[test]
    fn test_empty_id_rejected() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        assert!(matches!(
            store.add_device("  "),
            Err(VitalsError::InvalidDevice { .. })
        ));
    }

    #[test]
    fn test_background_mode_needs_runtime() {
        let store = VitalSignsStore::new(seeded()).unwrap();
        let err = store.add_device("OR01").unwrap_err();
        assert!(matches!(err, VitalsError::Runtime { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_events_in_order() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        let mut events = store.subscribe();
        store.add_device("OR01").unwrap();
        store.tick("OR01");
        store.remove_device("OR01");

        assert_eq!(events.try_recv().unwrap(), StoreEvent::Added { device_id: "OR01".into() });
        match events.try_recv().unwrap() {
            StoreEvent::Ticked { device_id, sequence, .. } => {
                assert_eq!(device_id.as_str(), "OR01");
                assert_eq!(sequence, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(events.try_recv().unwrap().is_for("OR01"));
    }

    #[test]
    fn test_shutdown_clears_everything() {
        let store = VitalSignsStore::new_manual(seeded()).unwrap();
        store.add_device("a").unwrap();
        store.add_device("b").unwrap();
        assert_eq!(store.device_ids(), vec![DeviceId::from("a"), DeviceId::from("b")]);
        store.shutdown();
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_ticks_at_interval() {
        let store = VitalSignsStore::new(seeded()).unwrap();
        store.add_device("demo-1").unwrap();
        assert_eq!(store.active_tickers(), 1);
        tokio::time::sleep(Duration::from_millis(205)).await;
        let ticks = store.tick_count("demo-1").unwrap();
        assert!((4..=5).contains(&ticks), "ticks = {}", ticks);
    }
}
