mod flash_store;
mod ram_flash;
mod record;

use core::fmt;

pub use flash_store::FlashStore;
pub use ram_flash::{RamFlash, RamFlashError};

use crate::config::MAX_STORED_LOCATIONS;
use crate::error::TimaError;
use crate::location::LocationFingerprint;
use crate::session::{SessionConfig, SessionStats};

pub type StoredFingerprints = heapless::Vec<LocationFingerprint, MAX_STORED_LOCATIONS>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    Full,
    Io,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "record not found",
            Self::Full => "store full",
            Self::Io => "storage i/o error",
        })
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for TimaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Full => TimaError::StorageFull,
            StoreError::NotFound | StoreError::Io => TimaError::PersistenceFailure,
        }
    }
}

/// Key-value persistence used by the session engine and the configuration
/// API. Every write either lands completely or leaves previous records
/// readable.
pub trait Persistence {
    fn read_config(&mut self) -> Result<SessionConfig, StoreError>;
    fn save_config(&mut self, config: &SessionConfig) -> Result<(), StoreError>;
    fn erase_all(&mut self) -> Result<(), StoreError>;

    /// Stores `stats` under a freshly assigned id and returns that id. The
    /// id carried by `stats` is ignored.
    fn append_session(&mut self, stats: &SessionStats) -> Result<u32, StoreError>;
    fn list_sessions(&mut self, max: usize) -> Result<Vec<SessionStats>, StoreError>;

    fn list_fingerprints(&mut self) -> Result<StoredFingerprints, StoreError>;
    fn append_fingerprint(&mut self, fingerprint: &LocationFingerprint) -> Result<(), StoreError>;
}

impl<P: Persistence + ?Sized> Persistence for &mut P {
    fn read_config(&mut self) -> Result<SessionConfig, StoreError> {
        (**self).read_config()
    }

    fn save_config(&mut self, config: &SessionConfig) -> Result<(), StoreError> {
        (**self).save_config(config)
    }

    fn erase_all(&mut self) -> Result<(), StoreError> {
        (**self).erase_all()
    }

    fn append_session(&mut self, stats: &SessionStats) -> Result<u32, StoreError> {
        (**self).append_session(stats)
    }

    fn list_sessions(&mut self, max: usize) -> Result<Vec<SessionStats>, StoreError> {
        (**self).list_sessions(max)
    }

    fn list_fingerprints(&mut self) -> Result<StoredFingerprints, StoreError> {
        (**self).list_fingerprints()
    }

    fn append_fingerprint(&mut self, fingerprint: &LocationFingerprint) -> Result<(), StoreError> {
        (**self).append_fingerprint(fingerprint)
    }
}
