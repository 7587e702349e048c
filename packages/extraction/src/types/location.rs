//! Storage locations - `s3://bucket/key` URIs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

const SCHEME: &str = "s3://";

/// An immutable pointer to a blob in object storage.
///
/// Keys are kept verbatim (no percent-decoding), matching how the data
/// automation service writes and reports its output URIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageLocation {
    bucket: String,
    key: String,
}

impl StorageLocation {
    /// Build a location from a bucket and key.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();
        let uri = format!("{SCHEME}{bucket}/{key}");

        if bucket.is_empty() || bucket.contains('/') {
            return Err(ExtractionError::InvalidLocation {
                uri,
                reason: "bucket must be a non-empty name without '/'",
            });
        }
        if key.is_empty() {
            return Err(ExtractionError::InvalidLocation {
                uri,
                reason: "key must not be empty",
            });
        }

        Ok(Self { bucket, key })
    }

    /// Parse an `s3://bucket/key` URI.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(SCHEME)
            .ok_or_else(|| ExtractionError::InvalidLocation {
                uri: uri.to_string(),
                reason: "expected s3:// scheme",
            })?;

        let (bucket, key) = rest
            .split_once('/')
            .ok_or_else(|| ExtractionError::InvalidLocation {
                uri: uri.to_string(),
                reason: "missing object key",
            })?;

        Self::new(bucket, key)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Location of a child object, e.g. the job output prefix
    /// `s3://bucket/input_data/doc.pdf/output`.
    pub fn child(&self, segment: &str) -> Self {
        let segment = segment.trim_start_matches('/');
        Self {
            bucket: self.bucket.clone(),
            key: format!("{}/{}", self.key.trim_end_matches('/'), segment),
        }
    }

    pub fn to_uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.key)
    }
}

impl FromStr for StorageLocation {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorageLocation {
    type Error = ExtractionError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StorageLocation> for String {
    fn from(location: StorageLocation) -> Self {
        location.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let loc = StorageLocation::parse("s3://my-bucket/input_data/pay slip.pdf").unwrap();
        assert_eq!(loc.bucket(), "my-bucket");
        assert_eq!(loc.key(), "input_data/pay slip.pdf");
        assert_eq!(loc.to_string(), "s3://my-bucket/input_data/pay slip.pdf");
    }

    #[test]
    fn test_parse_rejects_malformed_uris() {
        for uri in [
            "https://bucket/key",
            "s3://bucket",
            "s3://bucket/",
            "s3:///key",
            "bucket/key",
        ] {
            assert!(
                matches!(
                    StorageLocation::parse(uri),
                    Err(ExtractionError::InvalidLocation { .. })
                ),
                "{uri} should be rejected"
            );
        }
    }

    #[test]
    fn test_child_location() {
        let input = StorageLocation::new("b", "input_data/doc.pdf").unwrap();
        assert_eq!(
            input.child("output").to_string(),
            "s3://b/input_data/doc.pdf/output"
        );
    }

    #[test]
    fn test_serde_as_uri_string() {
        let loc = StorageLocation::new("b", "k/v.json").unwrap();
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, "\"s3://b/k/v.json\"");

        let back: StorageLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, loc);

        assert!(serde_json::from_str::<StorageLocation>("\"not-a-uri\"").is_err());
    }
}
