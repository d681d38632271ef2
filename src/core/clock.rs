//! Civil-time helpers.
//!
//! Enrollment deadlines are stored and compared in one fixed civil zone
//! (UTC-3). The expiration scheduler must use the same zone for the deadline
//! comparison and for the `modified_at` stamp it writes, so "now" is produced
//! in exactly one place.

use chrono::{DateTime, FixedOffset, Utc};

/// Offset of the civil zone all deadlines live in, in seconds east of UTC.
const CIVIL_OFFSET_SECS: i32 = -3 * 3600;

/// The fixed civil zone used for every deadline comparison and timestamp.
#[must_use]
pub fn civil_offset() -> FixedOffset {
    // A three-hour offset is always in range
    FixedOffset::east_opt(CIVIL_OFFSET_SECS).expect("valid fixed offset")
}

/// The current instant expressed in the civil zone.
#[must_use]
pub fn civil_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&civil_offset())
}
