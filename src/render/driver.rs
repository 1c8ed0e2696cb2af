//! Drives a monitor from store ticks
//! Location: src/render/driver.rs

use super::monitor::PatientMonitor;
use super::surface::DrawSurface;
use crate::store::{StoreEvent, VitalSignsStore};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

/// Advances and redraws one device's monitor for every tick of that device
///
/// The store's ticker is the frame clock: one `Ticked` event yields one frame.
pub struct FrameDriver<S: DrawSurface> {
    store: Arc<VitalSignsStore>,
    monitor: PatientMonitor,
    surface: S,
    events: broadcast::Receiver<StoreEvent>,
}

impl<S: DrawSurface> FrameDriver<S> {
    pub fn new(store: Arc<VitalSignsStore>, monitor: PatientMonitor, surface: S) -> Self {
        let events = store.subscribe();
        Self {
            store,
            monitor,
            surface,
            events,
        }
    }

    pub fn monitor(&self) -> &PatientMonitor {
        &self.monitor
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Advance one frame and redraw; `false` once the device is gone
    pub fn render_frame(&mut self) -> bool {
        let id = self.monitor.device_id().clone();
        let monitor = &mut self.monitor;
        let surface = &mut self.surface;
        self.store
            .with_snapshot(id.as_str(), |snapshot| {
                monitor.advance(snapshot);
                monitor.draw(surface, snapshot);
            })
            .is_some()
    }

    /// Wait for the device's next tick and render it
    ///
    /// Returns the number of frames rendered so far, or `None` when the
    /// device is removed or the store is dropped.
    pub async fn next_frame(&mut self) -> Option<u64> {
        let id = self.monitor.device_id().clone();
        loop {
            match self.events.recv().await {
                Ok(StoreEvent::Ticked { device_id, .. }) if device_id == id => {
                    return self.render_frame().then(|| self.monitor.frames());
                }
                Ok(StoreEvent::Removed { device_id }) if device_id == id => {
                    debug!(device = %id, "frame driver stopping");
                    return None;
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(device = %id, skipped, "frame driver lagged behind store events");
                    return self.render_frame().then(|| self.monitor.frames());
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DisplayConfig, StoreConfig};
    use crate::render::framebuffer::Framebuffer;
    use crate::synth::WaveformKind;

    fn manual_store() -> Arc<VitalSignsStore> {
        let config = StoreConfig {
            seed: Some(5),
            ..Default::default()
        };
        Arc::new(VitalSignsStore::new_manual(config).unwrap())
    }

    fn driver(store: &Arc<VitalSignsStore>, id: &str) -> FrameDriver<Framebuffer> {
        let config = DisplayConfig::default();
        let (w, h) = PatientMonitor::preferred_size(&config);
        FrameDriver::new(store.clone(), PatientMonitor::new(id, config), Framebuffer::new(w, h))
    }

    #[test]
    fn test_render_frame_for_missing_device() {
        let store = manual_store();
        let mut driver = driver(&store, "ghost");
        assert!(!driver.render_frame());
        assert_eq!(driver.monitor().frames(), 0);
    }

    #[tokio::test]
    async fn test_frames_follow_ticks() {
        let store = manual_store();
        store.add_device("OR01").unwrap();
        store.add_device("OR02").unwrap();
        let mut driver = driver(&store, "OR01");

        store.tick("OR02");
        store.tick("OR01");
        store.tick("OR01");
        assert_eq!(driver.next_frame().await, Some(1));
        assert_eq!(driver.next_frame().await, Some(2));
        assert!(driver.surface().text_runs().iter().any(|r| r.text == "ECG"));

        let ecg = store.snapshot("OR01").unwrap().ecg;
        let strip = driver.monitor().strip(WaveformKind::Ecg).unwrap();
        assert_eq!(strip.latest(), Some(ecg[1]));
    }

    #[tokio::test]
    async fn test_stops_on_remove() {
        let store = manual_store();
        store.add_device("ICU1").unwrap();
        let mut driver = driver(&store, "ICU1");
        store.remove_device("ICU1");
        assert_eq!(driver.next_frame().await, None);
    }
}
