use core::fmt::Write as _;

use crate::storage::Persistence;

use super::ApiError;

pub const STATS_CSV_HEADER: &str = "Session ID,Duration (s),Name,Mic Level\n";

pub fn export_stats_csv<P: Persistence>(store: &mut P, max: usize) -> Result<String, ApiError> {
    let sessions = store.list_sessions(max)?;
    let mut csv = String::from(STATS_CSV_HEADER);
    for stats in &sessions {
        let _ = writeln!(
            csv,
            "{},{},{},{}",
            stats.session_id, stats.duration_seconds, stats.location_name, stats.mic_level
        );
    }
    Ok(csv)
}
