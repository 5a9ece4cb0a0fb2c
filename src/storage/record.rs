use crate::config::{
    FINGERPRINT_MAX_APS, LOCATION_NAME_MAX, SSID_MAX, STORE_CONFIG_MAGIC,
    STORE_CONFIG_RECORD_LEN, STORE_CONFIG_VERSION, STORE_FINGERPRINT_MAGIC,
    STORE_FINGERPRINT_RECORD_LEN, STORE_FINGERPRINT_VERSION, STORE_SESSION_MAGIC,
    STORE_SESSION_RECORD_LEN, STORE_SESSION_VERSION,
};
use crate::location::{location_name, AccessPointObservation, LocationFingerprint};
use crate::session::{SessionConfig, SessionStats};

const SESSION_NAME_AT: usize = 15;
const FINGERPRINT_NAME_AT: usize = 6;
const FINGERPRINT_AP_COUNT_AT: usize = FINGERPRINT_NAME_AT + LOCATION_NAME_MAX;
const FINGERPRINT_APS_AT: usize = FINGERPRINT_AP_COUNT_AT + 1;
const AP_RECORD_LEN: usize = 8 + SSID_MAX;

pub(super) type ConfigRecord = [u8; STORE_CONFIG_RECORD_LEN];
pub(super) type SessionRecord = [u8; STORE_SESSION_RECORD_LEN];
pub(super) type FingerprintRecord = [u8; STORE_FINGERPRINT_RECORD_LEN];

pub(super) fn encode_config(config: &SessionConfig) -> ConfigRecord {
    let mut record = blank(STORE_CONFIG_MAGIC, STORE_CONFIG_VERSION);
    record[5..7].copy_from_slice(&config.work_seconds.to_le_bytes());
    record[7..9].copy_from_slice(&config.break_seconds.to_le_bytes());
    record[9..11].copy_from_slice(&config.long_break_seconds.to_le_bytes());
    record[11..13].copy_from_slice(&config.sessions_until_long_break.to_le_bytes());
    record[13..15].copy_from_slice(&config.timeout_seconds.to_le_bytes());
    record[15] = u8::from(config.break_gesture_enabled);
    seal(&mut record);
    record
}

pub(super) fn decode_config(record: &ConfigRecord) -> Option<SessionConfig> {
    if !is_valid(record, STORE_CONFIG_MAGIC, STORE_CONFIG_VERSION) {
        return None;
    }
    let break_gesture_enabled = match record[15] {
        0 => false,
        1 => true,
        _ => return None,
    };
    Some(SessionConfig {
        work_seconds: read_u16(record, 5),
        break_seconds: read_u16(record, 7),
        long_break_seconds: read_u16(record, 9),
        sessions_until_long_break: read_u16(record, 11),
        timeout_seconds: read_u16(record, 13),
        break_gesture_enabled,
    })
}

pub(super) fn encode_session(session_id: u32, stats: &SessionStats) -> SessionRecord {
    let mut record = blank(STORE_SESSION_MAGIC, STORE_SESSION_VERSION);
    record[5..9].copy_from_slice(&session_id.to_le_bytes());
    record[9..13].copy_from_slice(&stats.duration_seconds.to_le_bytes());
    record[13] = stats.mic_level;
    write_text(
        &mut record,
        SESSION_NAME_AT - 1,
        stats.location_name.as_bytes(),
        LOCATION_NAME_MAX,
    );
    seal(&mut record);
    record
}

pub(super) fn decode_session(record: &SessionRecord) -> Option<SessionStats> {
    if !is_valid(record, STORE_SESSION_MAGIC, STORE_SESSION_VERSION) {
        return None;
    }
    let name = read_text(record, SESSION_NAME_AT - 1, LOCATION_NAME_MAX)?;
    Some(SessionStats {
        session_id: read_u32(record, 5),
        duration_seconds: read_u32(record, 9),
        location_name: location_name(name),
        mic_level: record[13],
    })
}

pub(super) fn encode_fingerprint(fingerprint: &LocationFingerprint) -> FingerprintRecord {
    let mut record = blank(STORE_FINGERPRINT_MAGIC, STORE_FINGERPRINT_VERSION);
    write_text(
        &mut record,
        FINGERPRINT_NAME_AT - 1,
        fingerprint.name.as_bytes(),
        LOCATION_NAME_MAX,
    );
    record[FINGERPRINT_AP_COUNT_AT] = fingerprint.aps.len() as u8;
    for (idx, ap) in fingerprint.aps.iter().enumerate() {
        let at = FINGERPRINT_APS_AT + idx * AP_RECORD_LEN;
        record[at..at + 6].copy_from_slice(&ap.bssid);
        record[at + 6] = ap.rssi as u8;
        write_text(&mut record, at + 7, ap.ssid.as_bytes(), SSID_MAX);
    }
    seal(&mut record);
    record
}

pub(super) fn decode_fingerprint(record: &FingerprintRecord) -> Option<LocationFingerprint> {
    if !is_valid(record, STORE_FINGERPRINT_MAGIC, STORE_FINGERPRINT_VERSION) {
        return None;
    }
    let name = read_text(record, FINGERPRINT_NAME_AT - 1, LOCATION_NAME_MAX)?;
    let ap_count = usize::from(record[FINGERPRINT_AP_COUNT_AT]);
    if ap_count > FINGERPRINT_MAX_APS {
        return None;
    }

    let mut fingerprint = LocationFingerprint {
        name: location_name(name),
        aps: heapless::Vec::new(),
    };
    for idx in 0..ap_count {
        let at = FINGERPRINT_APS_AT + idx * AP_RECORD_LEN;
        let mut bssid = [0u8; 6];
        bssid.copy_from_slice(&record[at..at + 6]);
        let ssid = read_text(record, at + 7, SSID_MAX)?;
        let ap = AccessPointObservation::new(bssid, ssid, record[at + 6] as i8);
        fingerprint.aps.push(ap).ok()?;
    }
    Some(fingerprint)
}

pub(super) fn is_blank(record: &[u8]) -> bool {
    record.iter().all(|&byte| byte == 0xFF)
}

fn blank<const N: usize>(magic: u32, version: u8) -> [u8; N] {
    let mut record = [0xFFu8; N];
    record[0..4].copy_from_slice(&magic.to_le_bytes());
    record[4] = version;
    record
}

fn seal<const N: usize>(record: &mut [u8; N]) {
    record[N - 1] = checksum8(&record[..N - 1]);
}

fn is_valid<const N: usize>(record: &[u8; N], magic: u32, version: u8) -> bool {
    if is_blank(record) {
        return false;
    }
    if u32::from_le_bytes([record[0], record[1], record[2], record[3]]) != magic {
        return false;
    }
    if record[4] != version {
        return false;
    }
    record[N - 1] == checksum8(&record[..N - 1])
}

/// Length-prefixed text field: one length byte followed by `max` bytes.
fn write_text(record: &mut [u8], at: usize, text: &[u8], max: usize) {
    let len = text.len().min(max);
    record[at] = len as u8;
    record[at + 1..at + 1 + len].copy_from_slice(&text[..len]);
}

fn read_text(record: &[u8], at: usize, max: usize) -> Option<&str> {
    let len = usize::from(record[at]);
    if len > max {
        return None;
    }
    core::str::from_utf8(&record[at + 1..at + 1 + len]).ok()
}

fn read_u16(record: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([record[at], record[at + 1]])
}

fn read_u32(record: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
}

pub(super) fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fingerprint() -> LocationFingerprint {
        let mut aps = heapless::Vec::new();
        let _ = aps.push(AccessPointObservation::new([1, 2, 3, 4, 5, 6], "Büro", -41));
        let _ = aps.push(AccessPointObservation::new([9, 9, 9, 9, 9, 9], "", -77));
        LocationFingerprint {
            name: location_name("Büro_0006"),
            aps,
        }
    }

    #[test]
    fn layout_fits_record_lengths() {
        let fingerprint_end = FINGERPRINT_APS_AT + FINGERPRINT_MAX_APS * AP_RECORD_LEN;
        assert!(fingerprint_end < STORE_FINGERPRINT_RECORD_LEN);
        assert!(SESSION_NAME_AT + LOCATION_NAME_MAX < STORE_SESSION_RECORD_LEN);
    }

    #[test]
    fn fingerprint_record_preserves_negative_rssi_and_utf8() {
        let fingerprint = sample_fingerprint();
        let record = encode_fingerprint(&fingerprint);
        assert_eq!(decode_fingerprint(&record), Some(fingerprint));
    }

    #[test]
    fn flipped_byte_invalidates_record() {
        let stats = SessionStats {
            session_id: 0,
            duration_seconds: 1_500,
            location_name: location_name("home_00A7"),
            mic_level: 12,
        };
        let mut record = encode_session(7, &stats);
        assert_eq!(decode_session(&record).map(|s| s.session_id), Some(7));
        record[20] ^= 0x01;
        assert_eq!(decode_session(&record), None);
    }

    #[test]
    fn erased_record_reads_as_blank() {
        let record = [0xFFu8; STORE_CONFIG_RECORD_LEN];
        assert!(is_blank(&record));
        assert_eq!(decode_config(&record), None);
    }

    #[test]
    fn config_record_rejects_foreign_magic() {
        let mut record = encode_config(&SessionConfig::default());
        record[0] ^= 0xFF;
        record[STORE_CONFIG_RECORD_LEN - 1] = checksum8(&record[..STORE_CONFIG_RECORD_LEN - 1]);
        assert_eq!(decode_config(&record), None);
    }
}
