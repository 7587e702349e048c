//! Server-rendered page.

use minijinja::Environment;
use serde::Serialize;

use extraction::{Rendering, ResultRow, ResultTable};

use crate::domains::documents::preview::DocumentPreview;
use crate::domains::documents::DocumentType;

const INDEX_TEMPLATE: &str = "index.html";

pub const PAGE_TITLE: &str = "Turn Raw Documents into Actionable Data";

/// Everything the page shows for one response.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub document_types: Vec<&'static str>,
    pub selected: &'static str,
    pub headers: [&'static str; 2],
    pub rows: Vec<ResultRow>,
    pub no_results: bool,
    pub error: Option<String>,
    pub file_name: Option<String>,
    pub request_id: Option<String>,
    pub preview: Option<DocumentPreview>,
}

impl PageView {
    /// The empty form.
    pub fn new(selected: DocumentType) -> Self {
        Self {
            title: PAGE_TITLE,
            document_types: DocumentType::ALL.iter().map(|t| t.label()).collect(),
            selected: selected.label(),
            headers: ResultTable::HEADERS,
            rows: Vec::new(),
            no_results: false,
            error: None,
            file_name: None,
            request_id: None,
            preview: None,
        }
    }

    pub fn with_rendering(mut self, rendering: Rendering) -> Self {
        match rendering {
            Rendering::Table(table) => self.rows = table.rows,
            Rendering::NoValidResults => self.no_results = true,
        }
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_preview(mut self, preview: Option<DocumentPreview>) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_request(mut self, file_name: impl Into<String>, request_id: impl ToString) -> Self {
        self.file_name = Some(file_name.into());
        self.request_id = Some(request_id.to_string());
        self
    }
}

/// Compiled page templates. Output is HTML-escaped.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render_page(&self, view: &PageView) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX_TEMPLATE)?.render(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::documents::preview::PageText;

    fn row(index: usize, field: &str, value: &str) -> ResultRow {
        ResultRow {
            index,
            field: field.into(),
            value: value.into(),
        }
    }

    #[test]
    fn test_empty_form() {
        let html = Templates::new()
            .unwrap()
            .render_page(&PageView::new(DocumentType::Payslip))
            .unwrap();

        assert!(html.contains(PAGE_TITLE));
        assert!(html.contains(r#"<option value="Payslip" selected>"#));
        assert!(!html.contains("Structured Data Extracted from Document"));
    }

    #[test]
    fn test_table_rows_are_escaped() {
        let view = PageView::new(DocumentType::Payslip).with_rendering(Rendering::Table(
            ResultTable {
                rows: vec![row(1, "EmployeeName", "<b>Jane</b>")],
            },
        ));
        let html = Templates::new().unwrap().render_page(&view).unwrap();

        assert!(html.contains("Structured Data Extracted from Document"));
        assert!(html.contains("&lt;b&gt;Jane"));
        assert!(!html.contains("<b>Jane</b>"));
    }

    #[test]
    fn test_no_results_warning() {
        let view = PageView::new(DocumentType::Payslip).with_rendering(Rendering::NoValidResults);
        let html = Templates::new().unwrap().render_page(&view).unwrap();

        assert!(html.contains("No valid results found in the document."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_pdf_preview_lists_pages() {
        let view = PageView::new(DocumentType::Payslip).with_preview(Some(DocumentPreview::Pages {
            pages: vec![PageText {
                number: 1,
                text: "Gross pay 5000".into(),
            }],
        }));
        let html = Templates::new().unwrap().render_page(&view).unwrap();

        assert!(html.contains("<h3>Page 1</h3>"));
        assert!(html.contains("Gross pay 5000"));
    }

    #[test]
    fn test_png_preview_is_inline_image() {
        let view = PageView::new(DocumentType::Payslip).with_preview(Some(DocumentPreview::Image {
            data_uri: "data:image/png;base64,iVBORw0KGgo=".into(),
        }));
        let html = Templates::new().unwrap().render_page(&view).unwrap();

        assert!(html.contains("iVBORw0KGgo="));
        assert!(html.contains(r#"alt="Uploaded Image""#));
    }
}
