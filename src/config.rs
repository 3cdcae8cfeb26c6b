//! Driver configuration parameters
//!
//! Everything that differs between X9C parts and board layouts lives here,
//! so one driver serves both the 99-tap and 100-tap ladders.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::variant::ChipVariant;

/// Highest tap index on datasheet X9C parts (100 taps, 0..=99).
pub const DEFAULT_MAX_TAP: u8 = 99;
/// Non-volatile store cycle time budget (milliseconds).
pub const DEFAULT_STORE_SETTLE_MS: u32 = 20;
/// Upper bound on the per-level INC hold.
const MAX_PULSE_WIDTH_US: u32 = 1_000;

/// Per-device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiperConfig {
    /// Highest tap index the wiper can reach.
    pub max_tap: u8,
    /// Blocking wait after the store edge before the next command (ms).
    pub store_settle_ms: u32,
    /// Hold time for each INC level (µs). 0 toggles back-to-back.
    pub pulse_width_us: u32,
    /// Part number, used for resistance conversions.
    pub variant: ChipVariant,
}

impl Default for WiperConfig {
    fn default() -> Self {
        Self {
            max_tap: DEFAULT_MAX_TAP,
            store_settle_ms: DEFAULT_STORE_SETTLE_MS,
            pulse_width_us: 0,
            variant: ChipVariant::X9C103,
        }
    }
}

impl WiperConfig {
    /// Default configuration for a part with the given highest tap.
    pub fn with_max_tap(max_tap: u8) -> Self {
        Self {
            max_tap,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tap == 0 {
            return Err(ConfigError::ValidationFailed("max_tap must be non-zero"));
        }
        if self.store_settle_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "store_settle_ms must be non-zero",
            ));
        }
        if self.pulse_width_us > MAX_PULSE_WIDTH_US {
            return Err(ConfigError::ValidationFailed(
                "pulse_width_us exceeds 1000",
            ));
        }
        Ok(())
    }
}
