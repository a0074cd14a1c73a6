use axum::{
    body::{Body, Bytes},
    http::{Response, StatusCode},
};
use tracing::warn;

use crate::endpoints::{failure, json_response};
use crate::error::Error;
use crate::mention;
use crate::model::render_request::{RenderRequest, RenderResponse};

/// Decodes a prompt and returns its spans alongside its renderings and the template picker list.
pub async fn render(body: Bytes) -> Response<Body> {
    let request: RenderRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected render request: {e}");
            return failure(&Error::invalid_input(format!("Invalid render request: {e}")));
        }
    };

    let suggestions = match mention::suggestions() {
        Ok(suggestions) => suggestions,
        Err(e) => {
            tracing::error!("Building mention suggestions failed: {e}");
            return failure(&e);
        }
    };

    let response = RenderResponse {
        segments: mention::resolve(&request.text),
        expanded: mention::expand(&request.text),
        display: mention::render_display(&request.text),
        preview: mention::preview(&request.text),
        suggestions,
    };

    json_response(StatusCode::OK, &response)
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use super::*;
    use crate::endpoints::router;
    use crate::endpoints::tests::{body_json, json_request, send};
    use crate::mention::templates::{BIOLOGY_PROMPT, BIOLOGY_PROMPT_ID};
    use crate::state::tests::StateBuilder;

    #[tokio::test]
    async fn test_render_prompt() {
        let (state, _) = StateBuilder::default().build();
        let body = json!({"text": "@[biology-prompt](biology-prompt) plus @[Rubric](rubric-9)"});

        let (status, response) = send(
            router(state),
            json_request(Method::POST, "/api/mention/render", &body.to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["segments"][0]["kind"], "template");
        assert_eq!(body["segments"][0]["text"], BIOLOGY_PROMPT);
        assert_eq!(body["segments"][1], json!({"kind": "literal", "text": " plus "}));
        assert_eq!(
            body["segments"][2],
            json!({"kind": "unresolved", "display": "Rubric", "id": "rubric-9"})
        );
        assert_eq!(
            body["expanded"],
            format!("{BIOLOGY_PROMPT} plus @[Rubric](rubric-9)")
        );
        assert_eq!(body["display"], "biology-prompt plus Rubric");
        assert_eq!(body["preview"], format!("{BIOLOGY_PROMPT} plus Rubric"));
        assert_eq!(
            body["suggestions"][0],
            json!({"id": BIOLOGY_PROMPT_ID, "markup": "@[biology-prompt](biology-prompt)"})
        );
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_render_requires_text() {
        let (state, _) = StateBuilder::default().build();
        let (status, _) = send(
            router(state),
            json_request(Method::POST, "/api/mention/render", r#"{"prompt": "x"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
