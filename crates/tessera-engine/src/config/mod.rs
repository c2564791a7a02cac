//! Engine configuration.
//!
//! Plain structs with sensible defaults; binaries override the fields they
//! care about before handing the config to [`crate::core::EngineCtx::new`].

use std::time::Duration;

use crate::logging::LoggingConfig;

/// Delta-time clamps applied by the update clock.
#[derive(Debug, Clone, Copy)]
pub struct ClockConfig {
    pub dt_min: Duration,
    pub dt_max: Duration,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub clock: ClockConfig,
    /// Caps the number of texture units used by the renderer. `None` uses
    /// whatever the driver reports.
    pub max_texture_units: Option<u32>,
}
