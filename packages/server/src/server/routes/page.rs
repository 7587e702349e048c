//! The upload page and its form handler.

use axum::{
    extract::{multipart::MultipartError, Extension, Multipart},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use extraction::ExtractionError;

use crate::domains::documents::actions::{extract_document, UploadedFile};
use crate::domains::documents::preview::preview_document;
use crate::domains::documents::DocumentType;
use crate::server::app::AppState;
use crate::server::templates::PageView;

/// Fields of the upload form.
#[derive(Debug, Default)]
struct ExtractForm {
    document_type: Option<String>,
    file: Option<UploadedFile>,
}

async fn read_form(mut multipart: Multipart) -> Result<ExtractForm, MultipartError> {
    let mut form = ExtractForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("document_type") => form.document_type = Some(field.text().await?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    Ok(form)
}

fn render(state: &AppState, status: StatusCode, view: &PageView) -> Response {
    match state.templates.render_page(view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Status for a failed extraction; the page still shows the message.
fn failure_status(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<ExtractionError>() {
        Some(
            ExtractionError::UnsupportedMediaType(_)
            | ExtractionError::EmptyDocument { .. }
            | ExtractionError::InvalidDocumentName(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(ExtractionError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        Some(_) => StatusCode::BAD_GATEWAY,
        // Configuration problems
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// `GET /` - the empty upload form.
pub async fn index_handler(Extension(state): Extension<AppState>) -> Response {
    render(&state, StatusCode::OK, &PageView::new(DocumentType::Payslip))
}

/// `POST /extract` - preview the upload, run it through the pipeline and
/// show the result table, the "no valid results" warning, or the error.
pub async fn extract_handler(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected upload form");
            let view = PageView::new(DocumentType::Payslip)
                .with_error(format!("Could not read the upload: {}", e.body_text()));
            return render(&state, e.status(), &view);
        }
    };

    let document_type = match form
        .document_type
        .as_deref()
        .map(str::parse::<DocumentType>)
        .unwrap_or(Ok(DocumentType::Payslip))
    {
        Ok(document_type) => document_type,
        Err(e) => {
            let view = PageView::new(DocumentType::Payslip).with_error(e.to_string());
            return render(&state, StatusCode::BAD_REQUEST, &view);
        }
    };
    let view = PageView::new(document_type);

    let file = match form.file {
        Some(file) if !file.file_name.is_empty() => file,
        _ => {
            let view = view.with_error("Please choose a PDF or PNG file to upload.");
            return render(&state, StatusCode::BAD_REQUEST, &view);
        }
    };

    let view = view.with_preview(preview_document(&file).await);

    match extract_document(document_type, file, &state.deps).await {
        Ok(outcome) => {
            let view = view
                .with_request(&outcome.context.document_name, outcome.context.id)
                .with_rendering(outcome.rendering);
            render(&state, StatusCode::OK, &view)
        }
        Err(e) => {
            tracing::error!("Extraction request failed: {e:#}");
            let status = failure_status(&e);
            render(&state, status, &view.with_error(format!("{e:#}")))
        }
    }
}
