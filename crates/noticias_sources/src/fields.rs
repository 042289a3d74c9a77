//! One synonym table per normalized field, applied in one place. Each
//! origin stores the same logical fields under slightly different keys;
//! mapping picks the first present synonym in priority order.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

pub const TITLE_KEYS: &[&str] = &["titulo", "title", "nombre"];
pub const DATE_KEYS: &[&str] = &["fecha", "date", "created_at", "createdAt"];
pub const SUMMARY_KEYS: &[&str] = &["resumen", "summary", "description"];
pub const BODY_KEYS: &[&str] = &["body", "cuerpo", "content", "contenido"];
pub const IMAGE_KEYS: &[&str] = &["imagen", "image", "thumbnail", "thumbnailUrl"];
pub const DOCUMENT_KEYS: &[&str] = &["documento", "document", "pdf", "archivo"];

/// First value present under any of the given keys.
pub fn pick<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null())
}

/// First non-empty string present under any of the given keys.
pub fn pick_str(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First parsable date under any of the given keys. Malformed values are
/// treated the same as missing ones; the consumer substitutes a default.
pub fn pick_date(fields: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .filter_map(|v| v.as_str())
        .find_map(parse_date)
}

/// Parses RFC 3339 first, then a bare `YYYY-MM-DD` day.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Normalizes a storage reference. Absolute URLs pass through unchanged;
/// anything else is a storage key. A bare key without a path separator is
/// prefixed with the default folder before resolution. References the
/// resolver cannot turn into a public URL map to None, never to an error.
pub fn resolve_storage_ref<F>(raw: &str, default_folder: &str, to_public_url: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let key = if raw.contains('/') {
        raw.to_string()
    } else {
        format!("{}/{}", default_folder, raw)
    };
    to_public_url(&key)
}
