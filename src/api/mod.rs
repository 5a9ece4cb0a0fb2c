mod config_json;
mod stats_csv;

use core::fmt;

use log::info;

use crate::error::TimaError;
use crate::session::SessionConfig;
use crate::storage::Persistence;

pub use config_json::{apply_config_update, config_to_json, read_config_or_default, ConfigPatch};
pub use stats_csv::{export_stats_csv, STATS_CSV_HEADER};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiError {
    InvalidPayload,
    Persistence(TimaError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayload => f.write_str("invalid payload"),
            Self::Persistence(err) => write!(f, "persistence: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<crate::storage::StoreError> for ApiError {
    fn from(err: crate::storage::StoreError) -> Self {
        Self::Persistence(TimaError::from(err))
    }
}

/// Wipes every stored record and writes the default configuration back.
pub fn factory_reset<P: Persistence>(store: &mut P) -> Result<SessionConfig, ApiError> {
    store.erase_all()?;
    let defaults = SessionConfig::default();
    store.save_config(&defaults)?;
    info!("factory reset complete");
    Ok(defaults)
}
