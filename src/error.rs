use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimaError {
    /// A sensor collaborator produced no sample; the tick is skipped.
    SensorUnavailable,
    RadioScanFailed,
    PersistenceFailure,
    StorageFull,
}

impl TimaError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::SensorUnavailable => "sensor unavailable",
            Self::RadioScanFailed => "radio scan failed",
            Self::PersistenceFailure => "persistence failure",
            Self::StorageFull => "storage full",
        }
    }
}

impl fmt::Display for TimaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::error::Error for TimaError {}
