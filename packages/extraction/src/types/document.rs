//! Documents submitted for extraction.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};

/// Media types the data automation project accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "image/png")]
    Png,
}

impl MediaType {
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
        }
    }

    /// Parse a declared content type (parameters such as `; charset=` are ignored).
    pub fn from_mime(mime: &str) -> Result<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => Ok(Self::Pdf),
            "image/png" => Ok(Self::Png),
            _ => Err(ExtractionError::UnsupportedMediaType(mime.to_string())),
        }
    }

    /// Guess the media type from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let guess = mime_guess::from_path(name)
            .first()
            .ok_or_else(|| ExtractionError::UnsupportedMediaType(name.to_string()))?;
        Self::from_mime(guess.essence_str())
    }

    /// Use the declared type when it is specific, otherwise guess from the name.
    ///
    /// Browsers send `application/octet-stream` when they cannot tell.
    pub fn resolve(declared: Option<&str>, name: &str) -> Result<Self> {
        match declared.map(str::trim) {
            Some(mime) if !mime.is_empty() && mime != "application/octet-stream" => {
                Self::from_mime(mime)
            }
            _ => Self::from_file_name(name),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// A user-provided document. Lives for the duration of one request.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    media_type: MediaType,
    bytes: Vec<u8>,
}

impl Document {
    /// Create a document, keeping only the final path component of `name`.
    pub fn new(name: impl AsRef<str>, media_type: MediaType, bytes: Vec<u8>) -> Result<Self> {
        let raw = name.as_ref();
        let name = sanitize_file_name(raw)
            .ok_or_else(|| ExtractionError::InvalidDocumentName(raw.to_string()))?;

        if bytes.is_empty() {
            return Err(ExtractionError::EmptyDocument { name });
        }

        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Final path component, with Windows separators handled too.
fn sanitize_file_name(name: &str) -> Option<String> {
    let normalized = name.replace('\\', "/");
    let file_name = Path::new(&normalized).file_name()?.to_str()?.trim();

    if file_name.is_empty() || file_name == "." || file_name == ".." {
        None
    } else {
        Some(file_name.to_string())
    }
}
