use embedded_storage::{ReadStorage, Storage};
use log::{debug, warn};

use crate::config::{
    MAX_STORED_LOCATIONS, SESSION_LOG_CAPACITY, STORE_CONFIG_OFFSET, STORE_CONFIG_RECORD_LEN,
    STORE_FINGERPRINT_OFFSET, STORE_FINGERPRINT_RECORD_LEN, STORE_REGION_LEN,
    STORE_SESSION_OFFSET, STORE_SESSION_RECORD_LEN,
};
use crate::location::LocationFingerprint;
use crate::session::{SessionConfig, SessionStats};

use super::record::{
    decode_config, decode_fingerprint, decode_session, encode_config, encode_fingerprint,
    encode_session, is_blank, FingerprintRecord, SessionRecord,
};
use super::{Persistence, StoreError, StoredFingerprints};

const ERASE_CHUNK_LEN: usize = 256;

/// Fixed-slot record store on top of a byte-addressable flash region.
/// Config, fingerprints and session log each get their own slots; a slot
/// whose checksum does not verify is treated as free.
pub struct FlashStore<S> {
    flash: S,
    offset: u32,
}

impl<S> FlashStore<S>
where
    S: ReadStorage + Storage,
{
    pub fn new(flash: S, offset: u32) -> Self {
        Self { flash, offset }
    }

    /// Places the store in the last region of the flash.
    pub fn at_end(flash: S) -> Self {
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(STORE_REGION_LEN);
        Self::new(flash, offset)
    }

    pub fn flash(&self) -> &S {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut S {
        &mut self.flash
    }

    pub fn into_inner(self) -> S {
        self.flash
    }

    fn read_into(&mut self, relative: u32, bytes: &mut [u8]) -> Result<(), StoreError> {
        self.flash
            .read(self.offset + relative, bytes)
            .map_err(|_| StoreError::Io)
    }

    fn write_from(&mut self, relative: u32, bytes: &[u8]) -> Result<(), StoreError> {
        self.flash
            .write(self.offset + relative, bytes)
            .map_err(|_| StoreError::Io)
    }

    fn fingerprint_slot(idx: usize) -> u32 {
        STORE_FINGERPRINT_OFFSET + (idx * STORE_FINGERPRINT_RECORD_LEN) as u32
    }

    fn session_slot(idx: usize) -> u32 {
        STORE_SESSION_OFFSET + (idx * STORE_SESSION_RECORD_LEN) as u32
    }

    fn scan_fingerprints(&mut self) -> Result<(StoredFingerprints, Option<usize>), StoreError> {
        let mut stored = StoredFingerprints::new();
        let mut free_slot = None;
        for idx in 0..MAX_STORED_LOCATIONS {
            let mut record: FingerprintRecord = [0u8; STORE_FINGERPRINT_RECORD_LEN];
            self.read_into(Self::fingerprint_slot(idx), &mut record)?;
            match decode_fingerprint(&record) {
                Some(fingerprint) => {
                    let _ = stored.push(fingerprint);
                }
                None => {
                    if !is_blank(&record) {
                        debug!("fingerprint slot {idx} holds an invalid record");
                    }
                    free_slot.get_or_insert(idx);
                }
            }
        }
        Ok((stored, free_slot))
    }

    fn scan_sessions(&mut self) -> Result<(Vec<SessionStats>, Option<usize>), StoreError> {
        let mut sessions = Vec::new();
        let mut free_slot = None;
        for idx in 0..SESSION_LOG_CAPACITY {
            let mut record: SessionRecord = [0u8; STORE_SESSION_RECORD_LEN];
            self.read_into(Self::session_slot(idx), &mut record)?;
            match decode_session(&record) {
                Some(stats) => sessions.push(stats),
                None => {
                    free_slot.get_or_insert(idx);
                }
            }
        }
        sessions.sort_by_key(|stats| stats.session_id);
        Ok((sessions, free_slot))
    }
}

impl<S> Persistence for FlashStore<S>
where
    S: ReadStorage + Storage,
{
    fn read_config(&mut self) -> Result<SessionConfig, StoreError> {
        let mut record = [0u8; STORE_CONFIG_RECORD_LEN];
        self.read_into(STORE_CONFIG_OFFSET, &mut record)?;
        decode_config(&record).ok_or(StoreError::NotFound)
    }

    fn save_config(&mut self, config: &SessionConfig) -> Result<(), StoreError> {
        if self.read_config().ok().as_ref() == Some(config) {
            return Ok(());
        }
        let record = encode_config(config);
        self.write_from(STORE_CONFIG_OFFSET, &record)
    }

    fn erase_all(&mut self) -> Result<(), StoreError> {
        let blank = [0xFFu8; ERASE_CHUNK_LEN];
        let mut relative = 0u32;
        while relative < STORE_REGION_LEN {
            let len = (STORE_REGION_LEN - relative).min(ERASE_CHUNK_LEN as u32) as usize;
            self.write_from(relative, &blank[..len])?;
            relative += len as u32;
        }
        Ok(())
    }

    fn append_session(&mut self, stats: &SessionStats) -> Result<u32, StoreError> {
        let (sessions, free_slot) = self.scan_sessions()?;
        let Some(slot) = free_slot else {
            warn!("session log full; {} entries kept", sessions.len());
            return Err(StoreError::Full);
        };
        let session_id = sessions
            .last()
            .map_or(1, |newest| newest.session_id.wrapping_add(1));
        let record = encode_session(session_id, stats);
        self.write_from(Self::session_slot(slot), &record)?;
        Ok(session_id)
    }

    fn list_sessions(&mut self, max: usize) -> Result<Vec<SessionStats>, StoreError> {
        let (mut sessions, _) = self.scan_sessions()?;
        sessions.truncate(max);
        Ok(sessions)
    }

    fn list_fingerprints(&mut self) -> Result<StoredFingerprints, StoreError> {
        self.scan_fingerprints().map(|(stored, _)| stored)
    }

    fn append_fingerprint(&mut self, fingerprint: &LocationFingerprint) -> Result<(), StoreError> {
        let (_, free_slot) = self.scan_fingerprints()?;
        let Some(slot) = free_slot else {
            return Err(StoreError::Full);
        };
        let record = encode_fingerprint(fingerprint);
        self.write_from(Self::fingerprint_slot(slot), &record)
    }
}
