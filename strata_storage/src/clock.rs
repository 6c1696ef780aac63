use std::{
    sync::atomic::{AtomicI64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

/// Source of row timestamps for lines that do not carry one.
pub trait MicrosecondClock: Send + Sync {
    /// Current time in microseconds since the epoch.
    fn ticks(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default)]
pub struct OsMicrosecondClock;

impl MicrosecondClock for OsMicrosecondClock {
    fn ticks(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as i64)
            .unwrap_or(0)
    }
}

/// A settable clock for deterministic tests.
#[derive(Debug, Default)]
pub struct FixedClock {
    micros: AtomicI64,
}

impl FixedClock {
    pub fn new(micros: i64) -> Self {
        Self {
            micros: AtomicI64::new(micros),
        }
    }

    pub fn set(&self, micros: i64) {
        self.micros.store(micros, Ordering::Relaxed);
    }
}

impl MicrosecondClock for FixedClock {
    fn ticks(&self) -> i64 {
        self.micros.load(Ordering::Relaxed)
    }
}
