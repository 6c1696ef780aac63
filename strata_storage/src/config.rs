use std::sync::Arc;

use crate::clock::{MicrosecondClock, OsMicrosecondClock};

/// Engine-wide defaults consulted when creating tables and timestamping rows.
#[derive(Clone)]
pub struct EngineConfig {
    /// Whether symbol columns cache their dictionary by default.
    pub default_symbol_cache_flag: bool,
    /// Default dictionary capacity for symbol columns.
    pub default_symbol_capacity: usize,
    /// Clock used for rows without an explicit timestamp.
    pub clock: Arc<dyn MicrosecondClock>,
}

impl EngineConfig {
    pub fn with_clock(mut self, clock: Arc<dyn MicrosecondClock>) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_symbol_cache_flag: true,
            default_symbol_capacity: 128,
            clock: Arc::new(OsMicrosecondClock),
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("default_symbol_cache_flag", &self.default_symbol_cache_flag)
            .field("default_symbol_capacity", &self.default_symbol_capacity)
            .finish_non_exhaustive()
    }
}
