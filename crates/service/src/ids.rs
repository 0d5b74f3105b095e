//! Monotonic id assignment for catalog records.
//!
//! Ids derive from the unix-millisecond clock, bumped past the highest live
//! id so creations landing on the same millisecond stay distinct.

use chrono::Utc;

/// Next unique id given the highest id currently in the catalog.
pub fn next_id(max_existing: Option<i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    match max_existing {
        Some(max) if now <= max => max + 1,
        _ => now,
    }
}
