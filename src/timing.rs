//! # Timeout Randomizer
//!
//! Picks a bounded random receive duration per cycle and converts it to an
//! absolute radio-clock deadline.

use rand_core::RngCore;
use rand_wyrand::WyRand;

use crate::radio::RadioInstant;

/// Scale applied to the nominal tick rate when converting a picked timeout
/// into a radio-clock deadline.
///
/// The reference radio firmware applies a 0.5 factor here, so the actual
/// listen window is half the nominal picked seconds. That behavior is kept
/// as the default, but as explicit configuration: deployments that want the
/// nominal window set the scale to 1/1.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct DeadlineScale {
    pub numerator: u32,
    /// Must be non-zero; a zero denominator is treated as 1.
    pub denominator: u32,
}

impl DeadlineScale {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        DeadlineScale { numerator, denominator }
    }
}

impl Default for DeadlineScale {
    fn default() -> Self {
        DeadlineScale { numerator: 1, denominator: 2 }
    }
}

/// Picks a uniformly distributed integer number of seconds in
/// `[min_secs, max_secs)`. Degenerate ranges return `min_secs`.
pub fn pick_timeout(rng: &mut WyRand, min_secs: u32, max_secs: u32) -> u32 {
    if max_secs <= min_secs {
        return min_secs;
    }
    min_secs + rng.next_u32() % (max_secs - min_secs)
}

/// Converts a picked timeout into an absolute radio-clock deadline:
/// `now + timeout_secs * ticks_per_second * scale`.
///
/// Computed freshly from the radio clock at submission time; deadlines are
/// never cached across cycles.
pub fn rx_deadline(now: RadioInstant, timeout_secs: u32, ticks_per_second: u32, scale: &DeadlineScale) -> RadioInstant {
    let denominator = scale.denominator.max(1) as u64;
    let ticks = (timeout_secs as u64) * (ticks_per_second as u64) * (scale.numerator as u64) / denominator;
    now.plus_ticks(ticks)
}
