use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::common::errors::{DomainError, Result};
use crate::domain::entities::trash_entry::{FsId, TrashEntry};

/// One record of a `recycle/list` response as sent by the server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTrashEntryDto {
    pub path: String,
    pub server_filename: String,
    pub fs_id: FsId,
    /// Sent as `0`/`1` by the web API, as a bool by some mirrors
    #[serde(deserialize_with = "deserialize_flag")]
    pub isdir: bool,
    #[serde(default)]
    pub size: Option<u64>,
    pub server_mtime: i64,
}

/// Response of a trash listing request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListTrashResponseDto {
    pub errno: i64,
    #[serde(default)]
    pub list: Vec<RawTrashEntryDto>,
}

impl ListTrashResponseDto {
    pub fn is_success(&self) -> bool {
        self.errno == 0
    }
}

/// Acknowledgement of a restore, delete or clear request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AckDto {
    pub errno: i64,
    #[serde(default)]
    pub request_id: Option<u64>,
}

impl AckDto {
    pub fn ok() -> Self {
        Self { errno: 0, request_id: None }
    }

    /// Maps a non-zero errno to a `RemoteError`
    pub fn into_result(self) -> Result<Self> {
        if self.errno == 0 {
            Ok(self)
        } else {
            Err(DomainError::remote_errno("RemoteTrash", self.errno))
        }
    }
}

impl From<RawTrashEntryDto> for TrashEntry {
    fn from(raw: RawTrashEntryDto) -> Self {
        let size = if raw.isdir { None } else { raw.size };
        TrashEntry {
            path: raw.path,
            fs_id: raw.fs_id,
            is_dir: raw.isdir,
            size_bytes: size.unwrap_or(0),
            has_size: size.is_some(),
            deleted_at: raw.server_mtime,
            display_name: raw.server_filename,
        }
    }
}

/// Display record of a trash entry, one per table row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrashEntryDto {
    pub name: String,
    pub path: String,
    pub fs_id: String,
    pub is_dir: bool,
    pub size: u64,
    /// Empty for directories and files without a reported size
    pub human_size: String,
    pub deleted_at: String,
    pub remaining_days: i64,
    pub remaining_label: String,
}

impl TrashEntryDto {
    pub fn from_entry(entry: &TrashEntry, retention_days: i64, now: DateTime<Utc>) -> Self {
        let remaining_days = entry.remaining_days(retention_days, now);
        let human_size = if entry.is_dir || !entry.has_size {
            String::new()
        } else {
            format_human_size(entry.size_bytes)
        };

        Self {
            name: entry.display_name.clone(),
            path: entry.path.clone(),
            fs_id: entry.fs_id.to_string(),
            is_dir: entry.is_dir,
            size: entry.size_bytes,
            human_size,
            deleted_at: format_deleted_at(entry.deleted_at),
            remaining_days,
            remaining_label: format!("{} days", remaining_days),
        }
    }
}

const SIZE_UNITS: [&str; 4] = ["kB", "MB", "GB", "TB"];

/// Formats a byte count with base-1024 units: whole bytes below 1 kB
/// (`512 B`), one decimal above (`1.5 kB`). TB is the largest unit.
pub fn format_human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, SIZE_UNITS[unit])
}

/// ctime-style local time, e.g. `Mon May 20 14:03:09 2024`
pub fn format_deleted_at(epoch_seconds: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch_seconds, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%a %b %e %H:%M:%S %Y")
            .to_string(),
        None => String::new(),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}
