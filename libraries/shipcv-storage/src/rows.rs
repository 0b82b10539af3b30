//! Column conversions shared by the slices

use crate::{Result, StorageError};
use chrono::{DateTime, Utc};

pub(crate) fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::InvalidData(format!("timestamp {secs}")))
}

pub(crate) fn optional_timestamp(secs: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    secs.map(timestamp).transpose()
}

pub(crate) fn optional_json(raw: Option<String>) -> Result<Option<serde_json::Value>> {
    raw.map(|s| serde_json::from_str(&s).map_err(StorageError::from))
        .transpose()
}

pub(crate) fn json_text(value: Option<&serde_json::Value>) -> Result<Option<String>> {
    value
        .map(|v| serde_json::to_string(v).map_err(StorageError::from))
        .transpose()
}

pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}
