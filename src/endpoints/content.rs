//! Summarization and PDF extraction routes.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{Response, StatusCode},
};
use tracing::warn;

use crate::endpoints::{error_response, json_response, message_response};
use crate::error::Error;
use crate::model::json_field::{non_empty_string, parse_body};
use crate::model::simple_response::{MessageBody, TextBody};
use crate::state::SharedState;

pub const INVALID_EMAIL_CONTENT: &str = "Invalid email content provided.";
pub const SUMMARY_FAILED: &str = "An error occurred while summarizing the email.";
pub const INVALID_PDF_URL: &str = "Invalid or missing pdfUrl.";
pub const NOT_A_PDF: &str = "Fetched content is not a PDF.";
pub const PDF_PARSE_FAILED: &str = "An error occurred while parsing the PDF.";

/// Summarizes `emailContent`, which is either plain text or an image data URI.
pub async fn summarise(State(state): State<SharedState>, body: Bytes) -> Response<Body> {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected summary request: {e}");
            return message_response(StatusCode::BAD_REQUEST, INVALID_EMAIL_CONTENT);
        }
    };

    match state.summarizer.summarize_value(body.get("emailContent")).await {
        Ok(summary) => json_response(StatusCode::OK, &MessageBody::new(summary)),
        Err(e) if e.is_invalid_input() => {
            warn!("Rejected summary request: {e}");
            message_response(StatusCode::BAD_REQUEST, INVALID_EMAIL_CONTENT)
        }
        Err(e) => {
            tracing::error!("Summarization failed: {e}");
            message_response(StatusCode::INTERNAL_SERVER_ERROR, SUMMARY_FAILED)
        }
    }
}

/// Fetches `pdfUrl` and returns its text.
pub async fn pdf_to_text(State(state): State<SharedState>, body: Bytes) -> Response<Body> {
    let body = match parse_body(&body) {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejected PDF request: {e}");
            return error_response(StatusCode::BAD_REQUEST, invalid_message(e));
        }
    };

    let Some(pdf_url) = non_empty_string(&body, "pdfUrl") else {
        warn!("Rejected PDF request without a usable pdfUrl");
        return error_response(StatusCode::BAD_REQUEST, INVALID_PDF_URL);
    };

    match state.pdf.extract_text(pdf_url).await {
        Ok(text) => json_response(StatusCode::OK, &TextBody { text }),
        Err(e) => {
            tracing::error!("PDF extraction from {pdf_url} failed: {e}");
            pdf_failure(&e)
        }
    }
}

fn invalid_message(e: Error) -> String {
    match e {
        Error::InvalidInput(message) => message,
        other => other.to_string(),
    }
}

/// `{error}` response for a PDF that could not be fetched or parsed.
pub(crate) fn pdf_failure(e: &Error) -> Response<Body> {
    match e {
        Error::UpstreamFetch { status, reason } => error_response(
            e.status_code(),
            format!("Failed to fetch PDF: {status} {reason}"),
        ),
        Error::ContentType { .. } => error_response(StatusCode::BAD_REQUEST, NOT_A_PDF),
        _ => error_response(StatusCode::INTERNAL_SERVER_ERROR, PDF_PARSE_FAILED),
    }
}
