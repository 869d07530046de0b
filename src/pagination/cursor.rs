//! Cursor selection
//!
//! Trello pages backward from the newest item: `before=<id>` returns items
//! strictly older than `<id>`. The next cursor is therefore the id of the
//! oldest row seen on the current page.

use crate::flatten::{Record, Table};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Creation time encoded in a Trello object id.
///
/// The first 8 hex digits of the 24-digit id are a Unix timestamp in
/// seconds.
pub fn id_timestamp(id: &str) -> Option<DateTime<Utc>> {
    let prefix = id.get(..8)?;
    if !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let secs = u32::from_str_radix(prefix, 16).ok()?;
    DateTime::from_timestamp(i64::from(secs), 0)
}

/// Timestamp used to order a row: its date field when it parses as
/// RFC 3339, otherwise the creation time encoded in its id
pub fn row_timestamp(row: &Record, date_field: &str, id_field: &str) -> Option<DateTime<Utc>> {
    let from_date = row
        .get(date_field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc));

    from_date.or_else(|| {
        row.get(id_field)
            .and_then(Value::as_str)
            .and_then(id_timestamp)
    })
}

/// Id of the row with the earliest timestamp.
///
/// Rows without a string id or without a usable timestamp are skipped.
/// Rows sharing the earliest timestamp are ordered by id, smallest first:
/// Trello ids are fixed-width hex that grow with creation order, so the
/// smallest id is the oldest of the tied rows.
pub fn oldest_row_id(table: &Table, date_field: &str, id_field: &str) -> Option<String> {
    let mut oldest: Option<(DateTime<Utc>, &str)> = None;

    for row in table.rows() {
        let Some(id) = row.get(id_field).and_then(Value::as_str) else {
            continue;
        };
        let Some(timestamp) = row_timestamp(row, date_field, id_field) else {
            continue;
        };
        let older = match oldest {
            Some(current) => (timestamp, id) < current,
            None => true,
        };
        if older {
            oldest = Some((timestamp, id));
        }
    }

    oldest.map(|(_, id)| id.to_string())
}
