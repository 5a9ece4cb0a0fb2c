use log::{info, warn};

use crate::config::{LOCATION_MATCH_THRESHOLD, MAX_STORED_LOCATIONS, UNKNOWN_LOCATION};
use crate::error::TimaError;
use crate::storage::{Persistence, StoreError};
use crate::telemetry;

use super::fingerprint::{best_match, build_fingerprint};
use super::types::{location_name, AccessPointObservation, LocationName, ScanResults};

pub trait RadioScanner {
    fn scan(&mut self) -> Result<ScanResults, TimaError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ResolutionKind {
    Matched { score: f64 },
    Stored,
    /// Nothing to remember: the scan saw no access points.
    Unpersisted,
    Transient(TimaError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct LocationResolution {
    pub name: LocationName,
    pub kind: ResolutionKind,
}

impl LocationResolution {
    fn transient(name: LocationName, reason: TimaError) -> Self {
        telemetry::record_location_transient(reason);
        Self {
            name,
            kind: ResolutionKind::Transient(reason),
        }
    }

    pub fn error(&self) -> Option<TimaError> {
        match self.kind {
            ResolutionKind::Transient(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self.kind, ResolutionKind::Matched { .. } | ResolutionKind::Stored)
    }
}

pub fn resolve_location<P: Persistence>(
    scan: &[AccessPointObservation],
    store: &mut P,
) -> LocationResolution {
    let fingerprint = build_fingerprint(scan);
    if fingerprint.aps.is_empty() {
        return LocationResolution {
            name: fingerprint.name,
            kind: ResolutionKind::Unpersisted,
        };
    }

    let stored = match store.list_fingerprints() {
        Ok(stored) => stored,
        Err(err) => {
            warn!("location lookup failed: {err}");
            return LocationResolution::transient(fingerprint.name, TimaError::from(err));
        }
    };

    if let Some((best, score)) = best_match(&fingerprint, &stored) {
        if score > LOCATION_MATCH_THRESHOLD {
            return LocationResolution {
                name: best.name.clone(),
                kind: ResolutionKind::Matched { score },
            };
        }
    }

    if stored.len() >= MAX_STORED_LOCATIONS {
        warn!("location store full; using {} transiently", fingerprint.name);
        return LocationResolution::transient(fingerprint.name, TimaError::StorageFull);
    }

    match store.append_fingerprint(&fingerprint) {
        Ok(()) => {
            info!("stored new location {}", fingerprint.name);
            LocationResolution {
                name: fingerprint.name,
                kind: ResolutionKind::Stored,
            }
        }
        Err(err) => {
            warn!("location {} dropped: {err}", fingerprint.name);
            let reason = match err {
                StoreError::Full => TimaError::StorageFull,
                _ => TimaError::PersistenceFailure,
            };
            LocationResolution::transient(fingerprint.name, reason)
        }
    }
}

pub fn resolve_from_radio<R, P>(radio: &mut R, store: &mut P) -> LocationResolution
where
    R: RadioScanner,
    P: Persistence,
{
    match radio.scan() {
        Ok(scan) => {
            telemetry::record_radio_scan(scan.len());
            resolve_location(&scan, store)
        }
        Err(err) => {
            warn!("radio scan failed: {err}");
            LocationResolution::transient(location_name(UNKNOWN_LOCATION), TimaError::RadioScanFailed)
        }
    }
}
