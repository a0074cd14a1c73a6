use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{Response, StatusCode},
};
use tracing::warn;

use crate::endpoints::{failure, json_response};
use crate::error::Error;
use crate::model::view_preference::ViewPreference;
use crate::preferences::{ViewScope, load_view_mode, save_view_mode};
use crate::state::SharedState;

pub async fn get_preference(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Response<Body> {
    let scope = match key.parse::<ViewScope>() {
        Ok(scope) => scope,
        Err(e) => {
            warn!("Unknown preference {key}: {e}");
            return failure(&e);
        }
    };

    match load_view_mode(state.preferences.as_ref(), scope).await {
        Ok(view_mode) => json_response(StatusCode::OK, &ViewPreference { view_mode }),
        Err(e) => {
            tracing::error!("Loading preference {key} failed: {e}");
            failure(&e)
        }
    }
}

pub async fn put_preference(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Response<Body> {
    let scope = match key.parse::<ViewScope>() {
        Ok(scope) => scope,
        Err(e) => {
            warn!("Unknown preference {key}: {e}");
            return failure(&e);
        }
    };

    let preference: ViewPreference = match serde_json::from_slice(&body) {
        Ok(preference) => preference,
        Err(e) => {
            warn!("Rejected preference {key}: {e}");
            return failure(&Error::invalid_input(format!("Invalid preference: {e}")));
        }
    };

    match save_view_mode(state.preferences.as_ref(), scope, preference.view_mode).await {
        Ok(()) => json_response(StatusCode::OK, &preference),
        Err(e) => {
            tracing::error!("Saving preference {key} failed: {e}");
            failure(&e)
        }
    }
}
