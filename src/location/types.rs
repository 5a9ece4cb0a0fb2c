use crate::config::{FINGERPRINT_MAX_APS, LOCATION_NAME_MAX, SCAN_LIST_SIZE, SSID_MAX};

pub type LocationName = heapless::String<LOCATION_NAME_MAX>;
pub type Ssid = heapless::String<SSID_MAX>;
pub type ScanResults = heapless::Vec<AccessPointObservation, SCAN_LIST_SIZE>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPointObservation {
    pub bssid: [u8; 6],
    pub ssid: Ssid,
    pub rssi: i8,
}

impl AccessPointObservation {
    pub fn new(bssid: [u8; 6], ssid: &str, rssi: i8) -> Self {
        let mut owned = Ssid::new();
        let _ = owned.push_str(truncate_utf8(ssid, SSID_MAX));
        Self {
            bssid,
            ssid: owned,
            rssi,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationFingerprint {
    pub name: LocationName,
    pub aps: heapless::Vec<AccessPointObservation, FINGERPRINT_MAX_APS>,
}

impl LocationFingerprint {
    pub fn strongest(&self) -> Option<&AccessPointObservation> {
        self.aps.first()
    }
}

pub fn location_name(raw: &str) -> LocationName {
    let mut name = LocationName::new();
    let _ = name.push_str(truncate_utf8(raw, LOCATION_NAME_MAX));
    name
}

pub(crate) fn truncate_utf8(raw: &str, max_bytes: usize) -> &str {
    if raw.len() <= max_bytes {
        return raw;
    }
    let mut end = max_bytes;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    &raw[..end]
}
