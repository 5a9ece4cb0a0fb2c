pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod location;
pub mod loudness;
pub mod motion;
pub mod sampling;
pub mod session;
pub mod storage;
pub mod telemetry;

pub use error::TimaError;
