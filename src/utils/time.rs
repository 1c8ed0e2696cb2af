use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Time provider trait for dependency injection and testing
pub trait TimeProvider: Send + Sync {
    fn now_nanos(&self) -> u64;

    /// Time since `since_nanos`, zero if the clock reads earlier
    fn elapsed_since(&self, since_nanos: u64) -> Duration {
        Duration::from_nanos(self.now_nanos().saturating_sub(since_nanos))
    }
}

/// System time provider using actual system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_nanos(&self) -> u64 {
        current_timestamp_nanos()
    }
}

/// Mock time provider for deterministic testing
#[derive(Debug, Default)]
pub struct MockTimeProvider {
    current_time: AtomicU64,
}

impl MockTimeProvider {
    pub fn new(initial_time_nanos: u64) -> Self {
        Self {
            current_time: AtomicU64::new(initial_time_nanos),
        }
    }

    pub fn advance_by(&self, nanos: u64) {
        self.current_time.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_by(secs * NANOS_PER_SEC);
    }

    pub fn set_time(&self, nanos: u64) {
        self.current_time.store(nanos, Ordering::Relaxed);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_nanos(&self) -> u64 {
        self.current_time.load(Ordering::Relaxed)
    }
}

pub fn current_timestamp_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

fn split_hms(elapsed: Duration) -> (u64, u64, u64) {
    let secs = elapsed.as_secs();
    (secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Monitor header clock, `HH:MM:SS`
pub fn format_clock(elapsed: Duration) -> String {
    let (h, m, s) = split_hms(elapsed);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Session timer shown in the readout, e.g. `1h 2m 3s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let (h, m, s) = split_hms(elapsed);
    format!("{}h {}m {}s", h, m, s)
}
