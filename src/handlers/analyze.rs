use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult, ErrorKind};
use crate::middleware::REQUEST_ID_HEADER;
use crate::models::{AnalysisResponse, AnalysisStage, UploadedFile};
use crate::services::PdfTextExtractor;
use crate::state::AppState;

/// `POST /analyze-resume`
pub async fn analyze_resume_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalysisResponse>> {
    let start = Instant::now();
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    info!(request_id = %request_id, stage = %AnalysisStage::Validating, "Starting resume analysis");

    // A body that is not multipart at all carries no file either
    let mut multipart = multipart.map_err(|rejection| {
        debug!(request_id = %request_id, rejection = %rejection, "Request is not multipart");
        failed(&request_id, AnalysisStage::Validating)(AppError::MissingFile)
    })?;

    let file = extract_file_from_multipart(&mut multipart, state.config.max_file_size_mb)
        .await
        .map_err(failed(&request_id, AnalysisStage::Validating))?;

    if !file.has_pdf_extension() {
        return Err(failed(&request_id, AnalysisStage::Validating)(AppError::InvalidFileType));
    }

    info!(
        request_id = %request_id,
        stage = %AnalysisStage::Extracting,
        file_name = %file.name,
        file_size = file.size,
        mime_type = ?file.mime_type,
        "File accepted"
    );

    // The parsed document lives only inside the blocking task
    let content = file.content.clone();
    let extracted = tokio::task::spawn_blocking(move || PdfTextExtractor::new().extract_text(&content))
        .await
        .map_err(AppError::from)
        .and_then(|result| result)
        .map_err(failed(&request_id, AnalysisStage::Extracting))?;

    if extracted.is_blank() {
        return Err(failed(&request_id, AnalysisStage::Extracting)(AppError::EmptyDocument));
    }

    info!(
        request_id = %request_id,
        stage = %AnalysisStage::Requesting,
        page_count = extracted.page_count,
        pages_with_text = extracted.pages_with_text,
        text_length = extracted.text.len(),
        "Requesting analysis"
    );

    let reply = state
        .analyzer
        .analyze(&extracted.text)
        .await
        .map_err(failed(&request_id, AnalysisStage::Requesting))?;

    info!(
        request_id = %request_id,
        stage = %AnalysisStage::Responding,
        reply_length = reply.len(),
        total_time_ms = start.elapsed().as_millis() as u64,
        "Resume analyzed"
    );

    Ok(Json(AnalysisResponse::new(reply)))
}

/// Logs the stage a request failed in and passes the error through.
fn failed(request_id: &str, stage: AnalysisStage) -> impl FnOnce(AppError) -> AppError + '_ {
    move |err| {
        match err.kind() {
            ErrorKind::Client => warn!(
                request_id = %request_id,
                stage = %AnalysisStage::Failed,
                failed_in = %stage,
                error = %err,
                "Rejected upload"
            ),
            ErrorKind::Server => error!(
                request_id = %request_id,
                stage = %AnalysisStage::Failed,
                failed_in = %stage,
                error = %err,
                "Resume analysis failed"
            ),
        }
        err
    }
}

async fn extract_file_from_multipart(
    multipart: &mut Multipart,
    limit_mb: usize,
) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit_mb))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // A `file` field without a filename is a plain form value, not an upload
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!("Ignoring `file` form field without a filename");
            continue;
        };

        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit_mb))?;

        // The body limit leaves room for multipart framing; the file itself
        // must still fit the configured size
        if data.len() > limit_mb * 1024 * 1024 {
            return Err(AppError::FileTooLarge { limit: limit_mb });
        }

        let mut file = UploadedFile::new(file_name, data);

        if let Some(mime_type) = content_type {
            file = file.with_mime_type(mime_type);
        }

        debug!(
            "Extracted file: {} ({} bytes, type: {:?})",
            file.name,
            file.size,
            file.mime_type
        );

        return Ok(file);
    }

    Err(AppError::MissingFile)
}

fn multipart_error(err: MultipartError, limit_mb: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge { limit: limit_mb }
    } else {
        debug!("Failed to read multipart body: {}", err);
        AppError::MissingFile
    }
}
