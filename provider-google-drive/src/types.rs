//! Google Drive API response types
//!
//! Data structures for the subset of Google Drive API v3 resources the JSON
//! document client reads and writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MIME type stored on the dataset file.
pub const JSON_MIME_TYPE: &str = "application/json";

/// Reference to a file in Drive, as returned by files.list and uploads
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFileRef {
    /// Opaque Drive file ID
    pub id: String,

    /// File name
    pub name: String,

    /// Modification time (RFC 3339), when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,

    /// Size in bytes as a decimal string; uploads do not request it
    #[serde(rename = "size", default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<String>,
}

impl RemoteFileRef {
    /// Parsed modification time, if present and well-formed.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_time
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Parsed size in bytes, if present and numeric.
    pub fn size(&self) -> Option<u64> {
        self.size_bytes.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    #[serde(default)]
    pub files: Vec<RemoteFileRef>,
}

/// Metadata part of a multipart create request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata<'a> {
    pub name: &'a str,
    pub mime_type: &'a str,
}

impl<'a> FileMetadata<'a> {
    pub fn json(name: &'a str) -> Self {
        Self {
            name,
            mime_type: JSON_MIME_TYPE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_remote_file_deserialization() {
        let json = r#"{
            "id": "file1",
            "name": "data.json",
            "modifiedTime": "2024-03-01T10:15:30.000Z",
            "size": "2048"
        }"#;

        let file: RemoteFileRef = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, "file1");
        assert_eq!(file.name, "data.json");
        assert_eq!(file.size_bytes.as_deref(), Some("2048"));
        assert_eq!(file.size(), Some(2048));
        assert_eq!(
            file.modified_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap())
        );
    }

    #[test]
    fn test_remote_file_optional_fields() {
        let file: RemoteFileRef =
            serde_json::from_str(r#"{"id": "f", "name": "n"}"#).unwrap();
        assert_eq!(file.modified_time, None);
        assert_eq!(file.modified_at(), None);
        assert_eq!(file.size(), None);
    }

    #[test]
    fn test_malformed_optional_fields_are_none() {
        let file = RemoteFileRef {
            id: "f".to_string(),
            name: "n".to_string(),
            modified_time: Some("yesterday".to_string()),
            size_bytes: Some("big".to_string()),
        };
        assert_eq!(file.modified_at(), None);
        assert_eq!(file.size(), None);
    }

    #[test]
    fn test_files_list_missing_files_is_empty() {
        let list: FilesListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.files.is_empty());
    }

    #[test]
    fn test_metadata_serialization_order() {
        let json = serde_json::to_string(&FileMetadata::json("a \"quoted\" name")).unwrap();
        assert_eq!(
            json,
            r#"{"name":"a \"quoted\" name","mimeType":"application/json"}"#
        );
    }
}
