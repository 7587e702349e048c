//! Inline preview of the uploaded file, shown next to the extraction result.
//!
//! PNG uploads are embedded as a `data:` URI. PDF uploads are shown as the
//! text of each page, numbered from 1.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use extraction::MediaType;
use serde::Serialize;
use tracing::debug;

use super::actions::UploadedFile;

/// Text of one PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentPreview {
    Image { data_uri: String },
    Pages { pages: Vec<PageText> },
    Unavailable { reason: String },
}

impl DocumentPreview {
    pub fn image(media_type: MediaType, bytes: &[u8]) -> Self {
        Self::Image {
            data_uri: format!("data:{};base64,{}", media_type.as_mime(), STANDARD.encode(bytes)),
        }
    }

    pub fn from_pdf(document: &unpdf::Document) -> Self {
        let pages = document
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| PageText {
                number: i + 1,
                text: page.plain_text(),
            })
            .collect();
        Self::Pages { pages }
    }

    /// Parse PDF bytes; a file the parser can't read still gets extracted,
    /// it just has no text preview.
    pub fn pdf(bytes: &[u8]) -> Self {
        match unpdf::parse_bytes(bytes) {
            Ok(document) => Self::from_pdf(&document),
            Err(e) => {
                debug!(error = %e, "PDF preview unavailable");
                Self::Unavailable {
                    reason: format!("Could not read the PDF for preview: {e}"),
                }
            }
        }
    }
}

/// Preview for an uploaded file, or `None` when its type isn't supported.
///
/// PDF parsing runs on the blocking pool.
pub async fn preview_document(file: &UploadedFile) -> Option<DocumentPreview> {
    let media_type = MediaType::resolve(file.content_type.as_deref(), &file.file_name).ok()?;

    let preview = match media_type {
        MediaType::Png => DocumentPreview::image(media_type, &file.bytes),
        MediaType::Pdf => {
            let bytes = file.bytes.clone();
            tokio::task::spawn_blocking(move || DocumentPreview::pdf(&bytes))
                .await
                .unwrap_or_else(|e| DocumentPreview::Unavailable {
                    reason: format!("PDF preview failed: {e}"),
                })
        }
    };

    Some(preview)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn upload(file_name: &str, content_type: &str, bytes: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: file_name.into(),
            content_type: Some(content_type.into()),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_png_is_data_uri() {
        let preview = DocumentPreview::image(MediaType::Png, PNG_SIGNATURE);

        assert_eq!(
            preview,
            DocumentPreview::Image {
                data_uri: "data:image/png;base64,iVBORw0KGgo=".into()
            }
        );
    }

    #[test]
    fn test_pdf_pages_numbered_from_one() {
        let mut document = unpdf::Document::new();
        for (number, text) in [(1, "Gross pay 5000"), (2, "Net pay 4000")] {
            let mut page = unpdf::Page::letter(number);
            page.add_paragraph(unpdf::Paragraph::with_text(text));
            document.pages.push(page);
        }

        let DocumentPreview::Pages { pages } = DocumentPreview::from_pdf(&document) else {
            panic!("expected page text");
        };
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].text.contains("Gross pay 5000"));
        assert_eq!(pages[1].number, 2);
        assert!(pages[1].text.contains("Net pay 4000"));
    }

    #[test]
    fn test_unreadable_pdf_is_unavailable() {
        let preview = DocumentPreview::pdf(b"%PDF-1.7 truncated");

        assert!(matches!(preview, DocumentPreview::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_upload_has_no_preview() {
        let file = upload("notes.txt", "text/plain", b"hello");

        assert_eq!(preview_document(&file).await, None);
    }

    #[tokio::test]
    async fn test_octet_stream_png_is_previewed() {
        let file = upload("scan.png", "application/octet-stream", PNG_SIGNATURE);

        assert!(matches!(
            preview_document(&file).await,
            Some(DocumentPreview::Image { .. })
        ));
    }
}
