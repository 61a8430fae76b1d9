//! Response flattening
//!
//! The decrypted server response is a JSON array of JSON-encoded strings,
//! each decoding to `{"title": ..., "content": {field: value, ...}}`. The
//! per-record content maps are merged into one flat field map; on key
//! collision the later record wins. Records that fail to parse, or that
//! lack a usable content object, are skipped rather than failing the whole
//! response; the skip count is kept for diagnostics.

use indexmap::IndexMap;
use scansheet_core::AppError;
use serde_json::Value;

/// Flat field map extracted from the server's table response.
///
/// Field order is insertion order, so the CSV header and value rows stay
/// aligned.
#[derive(Clone, Debug, Default)]
pub struct FlattenedTable {
    pub fields: IndexMap<String, String>,
    /// Number of response elements that were silently skipped.
    pub skipped: usize,
}

impl FlattenedTable {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse the raw decrypted response and merge all content maps.
///
/// Fails only when the top-level value is not a JSON array of strings;
/// malformed elements inside the array are skipped leniently.
pub fn flatten(raw_json: &str) -> Result<FlattenedTable, AppError> {
    let records: Vec<String> = serde_json::from_str(raw_json).map_err(|e| {
        AppError::Protocol(format!("Response is not a JSON array of strings: {}", e))
    })?;

    let mut table = FlattenedTable::default();

    for (position, encoded) in records.iter().enumerate() {
        let content = match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Object(record)) => match record.get("content") {
                Some(Value::Object(content)) => content.clone(),
                _ => {
                    table.skipped += 1;
                    tracing::warn!(position, "record has no usable content object, skipping");
                    continue;
                }
            },
            _ => {
                table.skipped += 1;
                tracing::warn!(position, "unparseable record in response array, skipping");
                continue;
            }
        };

        for (key, value) in content {
            table.fields.insert(key, value_to_string(&value));
        }
    }

    tracing::debug!(
        fields = table.fields.len(),
        skipped = table.skipped,
        "flattened table response"
    );

    Ok(table)
}

/// String representation of a field value; null becomes the empty string.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
