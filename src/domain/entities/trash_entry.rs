use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Stable remote file-system identifier.
///
/// This is the only key accepted by the restore and delete endpoints; two
/// entries with the same path in different trash sessions get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FsId(pub u64);

impl fmt::Display for FsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FsId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FsId)
    }
}

/// A deleted remote file or directory as listed in the trash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashEntry {
    pub path: String,
    pub fs_id: FsId,
    pub is_dir: bool,
    /// Zero for directories and records without a size
    pub size_bytes: u64,
    /// Whether the server reported a size for this file
    pub has_size: bool,
    /// Server-reported deletion time, epoch seconds
    pub deleted_at: i64,
    pub display_name: String,
}

impl TrashEntry {
    /// Whole days between deletion and `now`, ignoring direction
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> i64 {
        (now.timestamp() - self.deleted_at).abs() / SECONDS_PER_DAY
    }

    /// Days left before the server purges this entry, given the retention
    /// window configured in `TrashConfig::retention_days`.
    ///
    /// Goes negative once the window has passed; nothing here enforces it.
    pub fn remaining_days(&self, retention_days: i64, now: DateTime<Utc>) -> i64 {
        retention_days - self.elapsed_days(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::MAX_RETENTION_DAYS;
    use chrono::{Duration, TimeZone};

    fn entry_deleted_at(deleted_at: DateTime<Utc>) -> TrashEntry {
        TrashEntry {
            path: "/docs/report.pdf".to_string(),
            fs_id: FsId(7),
            is_dir: false,
            size_bytes: 1024,
            has_size: true,
            deleted_at: deleted_at.timestamp(),
            display_name: "report.pdf".to_string(),
        }
    }

    #[test]
    fn test_remaining_days_three_days_ago() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let entry = entry_deleted_at(now - Duration::days(3));
        assert_eq!(entry.remaining_days(MAX_RETENTION_DAYS, now), 7);
    }

    #[test]
    fn test_remaining_days_goes_negative() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let entry = entry_deleted_at(now - Duration::days(12));
        assert_eq!(entry.remaining_days(MAX_RETENTION_DAYS, now), -2);
    }

    #[test]
    fn test_partial_day_is_truncated() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let entry = entry_deleted_at(now - Duration::hours(47));
        assert_eq!(entry.elapsed_days(now), 1);
        assert_eq!(entry.remaining_days(MAX_RETENTION_DAYS, now), 9);
    }

    #[test]
    fn test_fs_id_parse_and_display() {
        let id: FsId = " 1234567890123 ".parse().unwrap();
        assert_eq!(id, FsId(1234567890123));
        assert_eq!(id.to_string(), "1234567890123");
        assert!("abc".parse::<FsId>().is_err());
    }
}
