use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::TimaError;

static SAMPLES_SKIPPED_MOTION: AtomicU32 = AtomicU32::new(0);
static SAMPLES_SKIPPED_MIC: AtomicU32 = AtomicU32::new(0);
static RADIO_SCANS: AtomicU32 = AtomicU32::new(0);
static RADIO_SCANS_EMPTY: AtomicU32 = AtomicU32::new(0);
static LOCATIONS_TRANSIENT: AtomicU32 = AtomicU32::new(0);
static LOCATIONS_STORE_FULL: AtomicU32 = AtomicU32::new(0);
static SESSIONS_RECORDED: AtomicU32 = AtomicU32::new(0);
static SESSIONS_DROPPED: AtomicU32 = AtomicU32::new(0);
static CONFIG_FALLBACKS: AtomicU32 = AtomicU32::new(0);
static STALE_EXPIRIES: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub samples_skipped_motion: u32,
    pub samples_skipped_mic: u32,
    pub radio_scans: u32,
    pub radio_scans_empty: u32,
    pub locations_transient: u32,
    pub locations_store_full: u32,
    pub sessions_recorded: u32,
    pub sessions_dropped: u32,
    pub config_fallbacks: u32,
    pub stale_expiries: u32,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        samples_skipped_motion: SAMPLES_SKIPPED_MOTION.load(Ordering::Relaxed),
        samples_skipped_mic: SAMPLES_SKIPPED_MIC.load(Ordering::Relaxed),
        radio_scans: RADIO_SCANS.load(Ordering::Relaxed),
        radio_scans_empty: RADIO_SCANS_EMPTY.load(Ordering::Relaxed),
        locations_transient: LOCATIONS_TRANSIENT.load(Ordering::Relaxed),
        locations_store_full: LOCATIONS_STORE_FULL.load(Ordering::Relaxed),
        sessions_recorded: SESSIONS_RECORDED.load(Ordering::Relaxed),
        sessions_dropped: SESSIONS_DROPPED.load(Ordering::Relaxed),
        config_fallbacks: CONFIG_FALLBACKS.load(Ordering::Relaxed),
        stale_expiries: STALE_EXPIRIES.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_sample_skipped(motion: bool, mic: bool) {
    if motion {
        saturating_increment(&SAMPLES_SKIPPED_MOTION);
    }
    if mic {
        saturating_increment(&SAMPLES_SKIPPED_MIC);
    }
}

pub(crate) fn record_radio_scan(result_count: usize) {
    saturating_increment(&RADIO_SCANS);
    if result_count == 0 {
        saturating_increment(&RADIO_SCANS_EMPTY);
    }
}

pub(crate) fn record_location_transient(reason: TimaError) {
    saturating_increment(&LOCATIONS_TRANSIENT);
    if reason == TimaError::StorageFull {
        saturating_increment(&LOCATIONS_STORE_FULL);
    }
}

pub(crate) fn record_session_recorded() {
    saturating_increment(&SESSIONS_RECORDED);
}

pub(crate) fn record_session_dropped() {
    saturating_increment(&SESSIONS_DROPPED);
}

pub(crate) fn record_config_fallback() {
    saturating_increment(&CONFIG_FALLBACKS);
}

pub(crate) fn record_stale_expiry() {
    saturating_increment(&STALE_EXPIRIES);
}

fn saturating_increment(counter: &AtomicU32) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_add(1))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_only_grow() {
        let before = snapshot();
        record_location_transient(TimaError::StorageFull);
        record_radio_scan(0);
        let after = snapshot();
        assert!(after.locations_transient > before.locations_transient);
        assert!(after.locations_store_full > before.locations_store_full);
        assert!(after.radio_scans_empty > before.radio_scans_empty);
    }

    #[test]
    fn saturates_at_max() {
        let counter = AtomicU32::new(u32::MAX);
        saturating_increment(&counter);
        assert_eq!(counter.load(Ordering::Relaxed), u32::MAX);
    }
}
