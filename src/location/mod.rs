mod fingerprint;
mod resolver;
mod types;

pub use fingerprint::{best_match, build_fingerprint, similarity};
pub use resolver::{
    resolve_from_radio, resolve_location, LocationResolution, RadioScanner, ResolutionKind,
};
pub use types::{
    location_name, AccessPointObservation, LocationFingerprint, LocationName, ScanResults, Ssid,
};
