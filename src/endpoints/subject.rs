use axum::{
    body::{Body, Bytes},
    http::{Response, StatusCode},
};
use tracing::warn;

use crate::endpoints::{failure, json_response};
use crate::error::Error;
use crate::model::subject_selection::{SubjectSelectRequest, SubjectSelectResponse};
use crate::subject::{DISCARD_PROMPT_QUESTION, PromptEditor};

/// Applies a subject change to a form's prompt, honoring the discard confirmation.
pub async fn select_subject(body: Bytes) -> Response<Body> {
    let request: SubjectSelectRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected subject selection: {e}");
            return failure(&Error::invalid_input(format!("Invalid subject selection: {e}")));
        }
    };

    let mut editor = PromptEditor::new(request.subject, request.prompt);
    let mut asked = false;
    let selection = editor.select(request.next, &mut |_: &str| {
        asked = true;
        request.confirmed
    });

    let response = SubjectSelectResponse {
        selection,
        subject: editor.subject(),
        prompt: editor.prompt().to_string(),
        expanded_prompt: editor.expanded_prompt(),
        question: asked.then_some(DISCARD_PROMPT_QUESTION),
    };

    json_response(StatusCode::OK, &response)
}
