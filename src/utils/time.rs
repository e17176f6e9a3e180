//! Timestamp helpers for derived artifact names

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in milliseconds
///
/// Used to derive download filenames (`<mode>_<unixtime-ms>.png`,
/// `FabBanana_Batch_<unixtime-ms>.zip`).
pub fn unix_timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
