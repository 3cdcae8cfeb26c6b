//! X9C part variants and tap/resistance conversion.
//!
//! The part number encodes the end-to-end resistance (R_H to R_L).  The
//! resistance between the wiper and R_L grows linearly with the tap index,
//! offset by the wiper's own contact resistance.

use serde::{Deserialize, Serialize};

/// Typical wiper contact resistance (ohms).
pub const WIPER_RESISTANCE_OHMS: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChipVariant {
    /// 1 kΩ
    X9C102,
    /// 10 kΩ
    X9C103,
    /// 50 kΩ
    X9C503,
    /// 100 kΩ
    X9C104,
}

impl ChipVariant {
    /// End-to-end resistance in ohms.
    pub const fn end_to_end_ohms(self) -> u32 {
        match self {
            Self::X9C102 => 1_000,
            Self::X9C103 => 10_000,
            Self::X9C503 => 50_000,
            Self::X9C104 => 100_000,
        }
    }
}

/// Nominal wiper-to-R_L resistance at `tap`.
///
/// `tap` is bounded to `max_tap`; `max_tap` must be non-zero.
pub fn tap_to_ohms(variant: ChipVariant, tap: u8, max_tap: u8) -> u32 {
    let tap = tap.min(max_tap) as u32;
    variant.end_to_end_ohms() * tap / max_tap as u32 + WIPER_RESISTANCE_OHMS
}

/// Highest tap whose nominal resistance does not exceed `ohms`.
///
/// Requests below the wiper resistance land on tap 0, requests above the
/// full scale land on `max_tap`.
pub fn ohms_to_tap(variant: ChipVariant, ohms: u32, max_tap: u8) -> u8 {
    let full = variant.end_to_end_ohms();
    let ohms = ohms.clamp(WIPER_RESISTANCE_OHMS, full + WIPER_RESISTANCE_OHMS);
    let estimate = (ohms - WIPER_RESISTANCE_OHMS) as u64 * max_tap as u64 / full as u64;
    let mut tap = estimate.min(max_tap as u64) as u8;
    // tap_to_ohms floors, so the estimate can sit one tap low.
    while tap < max_tap && tap_to_ohms(variant, tap + 1, max_tap) <= ohms {
        tap += 1;
    }
    tap
}
