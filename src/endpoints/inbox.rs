//! Mock inbox routes.

use axum::{
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::{Response, StatusCode},
};
use tracing::warn;

use crate::endpoints::{content, failure, json_response, path_rejected};
use crate::inbox::{self, MessageBody, MessageHeader};
use crate::state::SharedState;

pub async fn list_folders(State(state): State<SharedState>) -> Response<Body> {
    json_response(StatusCode::OK, &state.mailbox.folders())
}

pub async fn list_messages(
    State(state): State<SharedState>,
    Path(folder): Path<String>,
) -> Response<Body> {
    match state.mailbox.folder(&folder) {
        Ok(messages) => {
            let headers: Vec<MessageHeader> = messages.iter().map(MessageHeader::from).collect();
            json_response(StatusCode::OK, &headers)
        }
        Err(e) => {
            warn!("Listing folder {folder} failed: {e}");
            failure(&e)
        }
    }
}

pub async fn get_message(
    State(state): State<SharedState>,
    path: Result<Path<(String, u32)>, PathRejection>,
) -> Response<Body> {
    let Path((folder, id)) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejected(rejection),
    };

    match state.mailbox.message(&folder, id) {
        Ok(message) => json_response(StatusCode::OK, message),
        Err(e) => {
            warn!("Reading {folder}/{id} failed: {e}");
            failure(&e)
        }
    }
}

/// Summarizes a text message or extracts the text of an embedded PDF.
pub async fn summarize_message(
    State(state): State<SharedState>,
    path: Result<Path<(String, u32)>, PathRejection>,
) -> Response<Body> {
    let Path((folder, id)) = match path {
        Ok(path) => path,
        Err(rejection) => return path_rejected(rejection),
    };

    let message = match state.mailbox.message(&folder, id) {
        Ok(message) => message,
        Err(e) => {
            warn!("Summarizing {folder}/{id} failed: {e}");
            return failure(&e);
        }
    };

    let result = inbox::summarize_message(
        message,
        &state.summarizer,
        &state.pdf,
        &state.config.server.public_origin,
    )
    .await;

    match result {
        Ok(summary) => json_response(StatusCode::OK, &summary),
        Err(e) => {
            tracing::error!("Summarizing {folder}/{id} failed: {e}");
            match message.body {
                // Embeds only fail on the PDF path
                MessageBody::Embed { .. } => content::pdf_failure(&e),
                MessageBody::Text { .. } => failure(&e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::endpoints::router;
    use crate::endpoints::content::{NOT_A_PDF, PDF_PARSE_FAILED};
    use crate::endpoints::tests::{body_json, get_request, json_request, send};
    use crate::inbox::SCANNED_PDF_TEXT;
    use crate::state::tests::StateBuilder;
    use crate::summarize::tests::RecordingModel;

    #[tokio::test]
    async fn test_folders_and_headers() {
        let (state, _) = StateBuilder::default().build();

        let (status, response) = send(router(state.clone()), get_request("/api/inbox")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body_json(response).await[2],
            json!({"name": "Sent Items", "count": 0})
        );

        let (status, response) = send(router(state.clone()), get_request("/api/inbox/Inbox")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body_json(response).await[1],
            json!({"id": 2, "subject": "Module 1 Tutorial Question (PDF)", "from": "susan@example.com"})
        );

        let (status, response) =
            send(router(state.clone()), get_request("/api/inbox/Sent%20Items")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let (status, _) = send(router(state), get_request("/api/inbox/Spam")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_message() {
        let (state, _) = StateBuilder::default().build();

        let (status, response) = send(router(state.clone()), get_request("/api/inbox/Inbox/2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body_json(response).await["body"],
            json!({"kind": "embed", "mimeType": "application/pdf", "sourceUrl": "/Module1TutorialQuestion.pdf"})
        );

        let (status, _) = send(router(state), get_request("/api/inbox/Inbox/7")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_summary_dispatch() {
        let (state, stubs) = StateBuilder::default()
            .model(RecordingModel::replying("Project is in development."))
            .build();

        let (status, response) = send(
            router(state.clone()),
            json_request(Method::POST, "/api/inbox/Inbox/1/summary", ""),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"kind": "summary", "text": "Project is in development."})
        );

        let (status, response) = send(
            router(state),
            json_request(Method::POST, "/api/inbox/Inbox/2/summary", ""),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"kind": "pdfText", "text": "Question 1: define osmosis."})
        );
        assert_eq!(stubs.model.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_of_scanned_pdf() {
        let (state, _) = StateBuilder::default()
            .pdf(StatusCode::OK, "application/pdf", Some(""))
            .build();

        let (_, response) = send(
            router(state),
            json_request(Method::POST, "/api/inbox/Inbox/2/summary", ""),
        )
        .await;
        assert_eq!(body_json(response).await["text"], SCANNED_PDF_TEXT);
    }

    #[tokio::test]
    async fn test_summary_when_pdf_is_missing() {
        let (state, _) = StateBuilder::default()
            .pdf(StatusCode::NOT_FOUND, "text/html", None)
            .build();

        let (status, response) = send(
            router(state),
            json_request(Method::POST, "/api/inbox/Inbox/2/summary", ""),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "Failed to fetch PDF: 404 Not Found"
        );
    }

    #[tokio::test]
    async fn test_summary_when_embed_is_not_a_pdf() {
        let (state, _) = StateBuilder::default()
            .pdf(StatusCode::OK, "text/html", Some("unused"))
            .build();

        let (status, response) = send(
            router(state),
            json_request(Method::POST, "/api/inbox/Inbox/2/summary", ""),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], NOT_A_PDF);
    }

    #[tokio::test]
    async fn test_summary_when_pdf_does_not_parse() {
        let (state, _) = StateBuilder::default()
            .pdf(StatusCode::OK, "application/pdf", None)
            .build();

        let (status, response) = send(
            router(state),
            json_request(Method::POST, "/api/inbox/Inbox/2/summary", ""),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], PDF_PARSE_FAILED);
    }

    #[tokio::test]
    async fn test_non_numeric_message_id_is_json_400() {
        let (state, _) = StateBuilder::default().build();

        for request in [
            get_request("/api/inbox/Inbox/abc"),
            json_request(Method::POST, "/api/inbox/Inbox/abc/summary", ""),
        ] {
            let (status, response) = send(router(state.clone()), request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response.headers()["content-type"], "application/json");
            assert!(body_json(response).await["error"].is_string());
        }
    }
}
