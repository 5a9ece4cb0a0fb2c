use core::fmt::Write as _;

use crate::config::{
    FINGERPRINT_MAX_APS, HIDDEN_LOCATION, LOCATION_OVERLAP_WEIGHT, LOCATION_RSSI_SCALE_SQ,
    LOCATION_RSSI_WEIGHT, LOCATION_SSID_PREFIX_MAX, UNKNOWN_LOCATION,
};

use super::types::{
    location_name, truncate_utf8, AccessPointObservation, LocationFingerprint, LocationName,
};

pub fn build_fingerprint(scan: &[AccessPointObservation]) -> LocationFingerprint {
    let mut aps: heapless::Vec<AccessPointObservation, FINGERPRINT_MAX_APS> = heapless::Vec::new();
    for observation in scan {
        // Equal RSSI keeps scan order.
        let slot = aps
            .iter()
            .position(|kept| observation.rssi > kept.rssi)
            .unwrap_or(aps.len());
        if slot >= FINGERPRINT_MAX_APS {
            continue;
        }
        if aps.is_full() {
            aps.pop();
        }
        if aps.push(observation.clone()).is_ok() {
            aps[slot..].rotate_right(1);
        }
    }

    LocationFingerprint {
        name: fingerprint_name(aps.first()),
        aps,
    }
}

fn fingerprint_name(strongest: Option<&AccessPointObservation>) -> LocationName {
    match strongest {
        None => location_name(UNKNOWN_LOCATION),
        Some(ap) if ap.ssid.is_empty() => location_name(HIDDEN_LOCATION),
        Some(ap) => {
            let mut name = LocationName::new();
            let _ = write!(
                name,
                "{}_{:04X}",
                truncate_utf8(&ap.ssid, LOCATION_SSID_PREFIX_MAX),
                ap.bssid[5]
            );
            name
        }
    }
}

/// Scores `scanned` against `stored`. Only the APs of `scanned` are looked
/// up, so callers pass the fresh scan first.
pub fn similarity(scanned: &LocationFingerprint, stored: &LocationFingerprint) -> f64 {
    let mut common = 0u32;
    let mut squared_delta = 0.0f64;
    for ap in &scanned.aps {
        if let Some(matching) = stored.aps.iter().find(|other| other.bssid == ap.bssid) {
            let delta = f64::from(ap.rssi) - f64::from(matching.rssi);
            squared_delta += delta * delta;
            common += 1;
        }
    }
    if common == 0 {
        return 0.0;
    }

    let common = f64::from(common);
    let overlap = common / FINGERPRINT_MAX_APS as f64;
    let closeness = 1.0 - squared_delta / (common * LOCATION_RSSI_SCALE_SQ);
    (LOCATION_OVERLAP_WEIGHT * overlap + LOCATION_RSSI_WEIGHT * closeness).clamp(0.0, 1.0)
}

pub fn best_match<'a>(
    scanned: &LocationFingerprint,
    stored: &'a [LocationFingerprint],
) -> Option<(&'a LocationFingerprint, f64)> {
    let mut best: Option<(&LocationFingerprint, f64)> = None;
    for candidate in stored {
        let score = similarity(scanned, candidate);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best
}
