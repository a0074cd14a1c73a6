//! Gmail OAuth routes.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Response, StatusCode, header::AUTHORIZATION},
};
use serde_json::json;
use tracing::{info, warn};

use crate::endpoints::{error_response, found, json_response};
use crate::gmail::DEFAULT_MAX_RESULTS;
use crate::model::callback_query::CallbackQuery;
use crate::state::SharedState;

pub const CONNECTED_LOCATION: &str = "/CogniC_Inquiry/?gmailConnected=true";
pub const MISSING_CODE: &str = "Missing authorization code";
pub const EXCHANGE_FAILED: &str = "Failed to exchange code for tokens";

/// Redirects the user to Google's consent screen.
pub async fn begin(State(state): State<SharedState>) -> Response<Body> {
    match state.gmail.auth_url() {
        Ok(url) => found(&url),
        Err(e) => {
            tracing::error!("Could not build the consent URL: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.")
        }
    }
}

/// Google redirects here with `?code=...` once the user has consented.
pub async fn callback(
    State(state): State<SharedState>,
    Query(query): Query<CallbackQuery>,
) -> Response<Body> {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        if let Some(error) = query.error {
            warn!("Consent was not granted: {error}");
        }
        return error_response(StatusCode::BAD_REQUEST, MISSING_CODE);
    };

    match state.gmail.exchange_code(&code).await {
        Ok(tokens) => {
            info!("Gmail connected ({tokens:?})");
            found(CONNECTED_LOCATION)
        }
        Err(e) => {
            tracing::error!("Error exchanging code for tokens: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, EXCHANGE_FAILED)
        }
    }
}

/// Lists the newest message references of the mailbox the bearer token belongs to.
pub async fn list_messages(State(state): State<SharedState>, headers: HeaderMap) -> Response<Body> {
    let Some(token) = headers
        .get(&AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
    else {
        return error_response(StatusCode::UNAUTHORIZED, "Missing access token");
    };

    match state.gmail.list_messages(token, DEFAULT_MAX_RESULTS).await {
        Ok(messages) => json_response(StatusCode::OK, &json!({ "messages": messages })),
        Err(e) => {
            tracing::error!("Listing Gmail messages failed: {e}");
            error_response(StatusCode::BAD_GATEWAY, "Failed to list messages")
        }
    }
}
