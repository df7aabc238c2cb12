//! # Visual Indicators
//!
//! Two independent diagnostic channels: one marks TX activity, one marks RX
//! activity. Toggling sets a channel to the logical NOT of its current
//! value. Purely diagnostic; no protocol meaning.

/// The two indicator channels driven by the cycle state machine.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum IndicatorChannel {
    TxActive,
    RxActive,
}

/// Visual indicator capability.
///
/// Hardware builds wrap LED pins behind this trait; the default
/// [`IndicatorPair`] keeps the state in memory.
pub trait Indicators {
    fn set(&mut self, channel: IndicatorChannel, on: bool);
    fn get(&self, channel: IndicatorChannel) -> bool;

    /// Sets the channel to the logical NOT of its current value.
    fn toggle(&mut self, channel: IndicatorChannel) {
        let current = self.get(channel);
        self.set(channel, !current);
    }
}

/// In-memory indicator pair. Both channels start off.
pub struct IndicatorPair {
    tx_active: bool,
    rx_active: bool,
}

impl IndicatorPair {
    pub const fn new() -> Self {
        IndicatorPair {
            tx_active: false,
            rx_active: false,
        }
    }
}

impl Default for IndicatorPair {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicators for IndicatorPair {
    fn set(&mut self, channel: IndicatorChannel, on: bool) {
        match channel {
            IndicatorChannel::TxActive => self.tx_active = on,
            IndicatorChannel::RxActive => self.rx_active = on,
        }
    }

    fn get(&self, channel: IndicatorChannel) -> bool {
        match channel {
            IndicatorChannel::TxActive => self.tx_active,
            IndicatorChannel::RxActive => self.rx_active,
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn channels_start_off() {
        let indicators = IndicatorPair::new();
        assert!(!indicators.get(IndicatorChannel::TxActive));
        assert!(!indicators.get(IndicatorChannel::RxActive));
    }

    #[test]
    fn toggle_flips_current_value() {
        let mut indicators = IndicatorPair::new();
        indicators.toggle(IndicatorChannel::TxActive);
        assert!(indicators.get(IndicatorChannel::TxActive));
        indicators.toggle(IndicatorChannel::TxActive);
        assert!(!indicators.get(IndicatorChannel::TxActive));
    }

    #[test]
    fn channels_are_independent() {
        let mut indicators = IndicatorPair::new();
        indicators.set(IndicatorChannel::RxActive, true);
        assert!(!indicators.get(IndicatorChannel::TxActive));
        assert!(indicators.get(IndicatorChannel::RxActive));
    }
}
