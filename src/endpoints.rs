//! Contains all endpoint-associated functions, grouped by the part of the portal they serve.
//!
//! Every route answers with JSON. Failures are logged here, at the boundary, and reported
//! under the key the route's callers expect (`error` or `message`).

use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, rejection::PathRejection},
    http::{
        HeaderName, HeaderValue, Method, Response, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE, LOCATION},
    },
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::Error;
use crate::model::simple_response::{ErrorBody, MessageBody};
use crate::state::SharedState;

pub mod assignment;
pub mod auth;
pub mod content;
pub mod inbox;
pub mod mention;
pub mod preferences;
pub mod subject;

pub const OK_JSON: &str = r#"{ "message": "OK" }"#;

/// Carries non-fatal validation warnings back to the frontend.
pub const PROMPT_WARNING: HeaderName = HeaderName::from_static("prompt-warning");

/// Builds the API router. Static files, if any, are attached by the caller as a fallback.
pub fn router(state: SharedState) -> Router {
    // Allow any origin, and expose the content type and the prompt warning so the
    // frontend can read them.
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_origin(AllowOrigin::any())
        .expose_headers([CONTENT_TYPE, PROMPT_WARNING]);

    let body_limit = state.config.server.body_limit;

    Router::new()
        .route("/api/summarise", post(content::summarise))
        .route("/api/pdftotext", post(content::pdf_to_text))
        .route("/api/auth", get(auth::begin))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/gmail/messages", get(auth::list_messages))
        .route(
            "/api/assignment",
            get(assignment::list_assignments).post(assignment::create_assignment),
        )
        .route("/api/assignment/grouped", get(assignment::grouped_assignments))
        .route(
            "/api/assignment/{id}",
            get(assignment::get_assignment)
                .put(assignment::update_assignment)
                .delete(assignment::delete_assignment),
        )
        .route(
            "/api/preferences/{key}",
            get(preferences::get_preference).put(preferences::put_preference),
        )
        .route("/api/mention/render", post(mention::render))
        .route("/api/subject/select", post(subject::select_subject))
        .route("/api/inbox", get(inbox::list_folders))
        .route("/api/inbox/{folder}", get(inbox::list_messages))
        .route("/api/inbox/{folder}/{id}", get(inbox::get_message))
        .route("/api/inbox/{folder}/{id}/summary", post(inbox::summarize_message))
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Serializes `body` as the JSON response for `status`.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    match serde_json::to_string(body) {
        Ok(json) => raw_json(status, json),
        Err(e) => {
            tracing::error!("Could not serialize response: {e}");
            raw_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{ "error": "Internal Server Error." }"#.to_string(),
            )
        }
    }
}

pub fn raw_json(status: StatusCode, json: String) -> Response<Body> {
    let mut response = Response::new(Body::from(json));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response<Body> {
    json_response(status, &ErrorBody::new(error))
}

pub fn message_response(status: StatusCode, message: impl Into<String>) -> Response<Body> {
    json_response(status, &MessageBody::new(message))
}

/// `{error}` response for `e`, with its message passed through for client errors and
/// replaced by a generic one otherwise.
pub fn failure(e: &Error) -> Response<Body> {
    let status = e.status_code();
    match e {
        Error::InvalidInput(message) => error_response(status, message.clone()),
        Error::NotFound(_) => error_response(status, "Not Found."),
        _ => error_response(status, "Internal Server Error."),
    }
}

/// JSON `{error}` in place of axum's plain-text answer for a path that does not parse.
pub fn path_rejected(rejection: PathRejection) -> Response<Body> {
    tracing::warn!("Rejected request path: {rejection}");
    error_response(rejection.status(), rejection.body_text())
}

/// 302 to `location`. `Redirect::to` would answer 303.
pub fn found(location: &str) -> Response<Body> {
    let Ok(location) = HeaderValue::try_from(location) else {
        tracing::error!("Refusing to redirect to an invalid location");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.");
    };

    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::FOUND;
    response.headers_mut().insert(LOCATION, location);
    response
}
