use log::{info, warn};
use serde::Deserialize;

use crate::session::SessionConfig;
use crate::storage::{Persistence, StoreError};

use super::ApiError;

/// Partial configuration update. Absent fields keep their stored value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    #[serde(rename = "workTimeSeconds")]
    pub work_seconds: Option<u16>,
    #[serde(rename = "breakTimeSeconds")]
    pub break_seconds: Option<u16>,
    #[serde(rename = "longBreakTimeSeconds")]
    pub long_break_seconds: Option<u16>,
    #[serde(rename = "longBreakSessionCount")]
    pub sessions_until_long_break: Option<u16>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u16>,
    #[serde(rename = "breakGestureEnabled")]
    pub break_gesture_enabled: Option<bool>,
}

impl ConfigPatch {
    pub fn apply_to(self, config: SessionConfig) -> SessionConfig {
        SessionConfig {
            work_seconds: self.work_seconds.unwrap_or(config.work_seconds),
            break_seconds: self.break_seconds.unwrap_or(config.break_seconds),
            long_break_seconds: self.long_break_seconds.unwrap_or(config.long_break_seconds),
            sessions_until_long_break: self
                .sessions_until_long_break
                .unwrap_or(config.sessions_until_long_break),
            timeout_seconds: self.timeout_seconds.unwrap_or(config.timeout_seconds),
            break_gesture_enabled: self
                .break_gesture_enabled
                .unwrap_or(config.break_gesture_enabled),
        }
    }
}

pub fn config_to_json(config: &SessionConfig) -> String {
    serde_json::to_string(config).unwrap_or_default()
}

/// Stored configuration, or defaults when nothing has been saved yet.
pub fn read_config_or_default<P: Persistence>(store: &mut P) -> Result<SessionConfig, ApiError> {
    match store.read_config() {
        Ok(config) => Ok(config),
        Err(StoreError::NotFound) => Ok(SessionConfig::default()),
        Err(err) => Err(err.into()),
    }
}

pub fn apply_config_update<P: Persistence>(
    store: &mut P,
    body: &[u8],
) -> Result<SessionConfig, ApiError> {
    let patch: ConfigPatch = serde_json::from_slice(body).map_err(|err| {
        warn!("config update rejected: {err}");
        ApiError::InvalidPayload
    })?;
    let current = read_config_or_default(store)?;
    let updated = patch.apply_to(current).sanitized();
    store.save_config(&updated)?;
    info!("config updated: {}", config_to_json(&updated));
    Ok(updated)
}
