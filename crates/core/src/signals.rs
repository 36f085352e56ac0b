//! Upstream sensor collaborator.
//!
//! Acquisition of physiological samples lives outside this workspace; the
//! engine only needs a synchronous getter returning the latest readings.

use crate::context::RawSignals;

/// Supplies the most recent raw readings.
pub trait SignalSource: Send + Sync {
    fn read(&self) -> RawSignals;
}

/// A fixed set of readings (CLI flags, tests, replay).
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSignals(pub RawSignals);

impl SignalSource for StaticSignals {
    fn read(&self) -> RawSignals {
        self.0
    }
}

impl<F> SignalSource for F
where
    F: Fn() -> RawSignals + Send + Sync,
{
    fn read(&self) -> RawSignals {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_signals_return_snapshot() {
        let source = StaticSignals(RawSignals::default().with_heart_rate(72.0));
        assert_eq!(source.read().heart_rate, Some(72.0));
    }

    #[test]
    fn closures_are_signal_sources() {
        let source = || RawSignals::default().with_step_count(1200);
        assert_eq!(SignalSource::read(&source).step_count, Some(1200));
    }
}
