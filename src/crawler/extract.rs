//! Heuristic extraction of file records from unknown JSON response shapes.
//!
//! The origin's folder-listing endpoints are undocumented and their response
//! shapes vary by account, region, and deployment. Extraction is therefore
//! driven by ordered alias tables rather than a schema: the first matching
//! record-array path wins, and each record field is taken from the first
//! present alias. New origin shapes are added by extending the tables, not by
//! adding branches.

use serde::Serialize;
use serde_json::Value;

/// Record-array locations tested against a decoded JSON body, in priority
/// order. The first path that is present and is an array supplies the
/// candidate records; `list` beats `data.list` beats `data`.
const RECORD_ARRAY_PATHS: [&[&str]; 3] = [&["list"], &["data", "list"], &["data"]];

/// Field aliases for the display filename. Records lacking all of these are
/// dropped.
const NAME_FIELDS: [&str; 3] = ["server_filename", "name", "filename"];

/// Field aliases for the byte size.
const SIZE_FIELDS: [&str; 2] = ["size", "filesize"];

/// Field aliases for a byte-fetchable URL, when one appears in the response.
const DIRECT_URL_FIELDS: [&str; 3] = ["dlink", "downloadUrl", "directUrl"];

/// Field aliases for a server-assigned file id.
const ID_FIELDS: [&str; 3] = ["fs_id", "id", "file_id"];

/// The normalized record representing one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Best-available stable identifier (server-assigned id, else the name).
    /// Used only for dedup within one crawl; not globally unique.
    pub id: String,
    /// Display filename as reported by the origin.
    pub name: String,
    /// Byte count if reported.
    pub size: Option<u64>,
    /// Byte-fetchable URL if one was observed in any intercepted response.
    pub direct_url: Option<String>,
}

impl FileDescriptor {
    /// Returns the dedup key: the `(id, name)` composite, unique within one
    /// crawl result.
    #[must_use]
    pub fn dedup_key(&self) -> (String, String) {
        (self.id.clone(), self.name.clone())
    }
}

/// Returns the candidate record array for a decoded JSON body, or `None`
/// when no known shape matches (the response contributes nothing).
#[must_use]
pub fn record_array(body: &Value) -> Option<&[Value]> {
    RECORD_ARRAY_PATHS.iter().find_map(|path| {
        let mut node = body;
        for key in *path {
            node = node.get(key)?;
        }
        node.as_array().map(Vec::as_slice)
    })
}

/// Normalizes one candidate record into a descriptor.
///
/// Returns `None` when no name can be derived. The id falls back to the name
/// itself when no id-like field exists.
#[must_use]
pub fn descriptor_from_record(record: &Value) -> Option<FileDescriptor> {
    let name = first_string(record, &NAME_FIELDS)?;
    let size = first_u64(record, &SIZE_FIELDS);
    let direct_url = first_string(record, &DIRECT_URL_FIELDS);
    let id = first_scalar_string(record, &ID_FIELDS).unwrap_or_else(|| name.clone());

    Some(FileDescriptor {
        id,
        name,
        size,
        direct_url,
    })
}

/// First present alias whose value is a non-empty string.
fn first_string(record: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        record
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
            .map(std::string::ToString::to_string)
    })
}

/// First present alias whose value is a non-negative integer, accepting both
/// JSON numbers and numeric strings (the origin emits either).
fn first_u64(record: &Value, fields: &[&str]) -> Option<u64> {
    fields.iter().find_map(|field| {
        let value = record.get(field)?;
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|raw| raw.parse::<u64>().ok()))
    })
}

/// First present alias rendered as a string: string values pass through,
/// numeric values (e.g. `fs_id`) are formatted.
fn first_scalar_string(record: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        let value = record.get(field)?;
        match value {
            Value::String(text) if !text.is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    })
}
