//! `multipart/related` bodies for Drive metadata + media uploads
//!
//! See: https://developers.google.com/drive/api/guides/manage-uploads#multipart

use bridge_traits::crypto::{random_string, RandomSource, ALPHANUMERIC_CHARSET};

use crate::error::{GoogleDriveError, Result};

const BOUNDARY_PREFIX: &str = "drivesync-";
const BOUNDARY_RANDOM_LENGTH: usize = 12;

/// A two-part `multipart/related` body: JSON metadata, then JSON content.
#[derive(Debug, Clone)]
pub struct MultipartRelated {
    boundary: String,
    body: String,
}

impl MultipartRelated {
    /// Build a body with a freshly generated boundary.
    pub fn new(random: &dyn RandomSource, metadata_json: &str, content_json: &str) -> Result<Self> {
        let suffix = random_string(random, BOUNDARY_RANDOM_LENGTH, ALPHANUMERIC_CHARSET)
            .map_err(|e| GoogleDriveError::RandomUnavailable(e.to_string()))?;

        Ok(Self::with_boundary(
            format!("{}{}", BOUNDARY_PREFIX, suffix),
            metadata_json,
            content_json,
        ))
    }

    pub fn with_boundary(boundary: String, metadata_json: &str, content_json: &str) -> Self {
        let body = format!(
            "--{b}\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\r\n\
             {metadata}\r\n\
             --{b}\r\n\
             Content-Type: application/json\r\n\r\n\
             {content}\r\n\
             --{b}--",
            b = boundary,
            metadata = metadata_json,
            content = content_json,
        );

        Self { boundary, body }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }

    pub fn into_body(self) -> String {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::OsRandom;

    #[test]
    fn test_body_layout() {
        let multipart = MultipartRelated::with_boundary("B".to_string(), "{\"m\":1}", "{\"c\":2}");
        assert_eq!(multipart.content_type(), "multipart/related; boundary=B");
        assert_eq!(
            multipart.into_body(),
            "--B\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{\"m\":1}\r\n--B\r\nContent-Type: application/json\r\n\r\n{\"c\":2}\r\n--B--"
        );
    }

    #[test]
    fn test_generated_boundary() {
        let multipart = MultipartRelated::new(&OsRandom, "{}", "{}").unwrap();
        let boundary = multipart.boundary();

        assert!(boundary.starts_with(BOUNDARY_PREFIX));
        assert_eq!(boundary.len(), BOUNDARY_PREFIX.len() + BOUNDARY_RANDOM_LENGTH);
        assert!(boundary[BOUNDARY_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_boundaries_differ() {
        let first = MultipartRelated::new(&OsRandom, "{}", "{}").unwrap();
        let second = MultipartRelated::new(&OsRandom, "{}", "{}").unwrap();
        assert_ne!(first.boundary(), second.boundary());
    }
}
