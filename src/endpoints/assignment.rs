//! Assignment CRUD routes.

use axum::{
    body::{Body, Bytes},
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{HeaderValue, Response, StatusCode},
};
use tracing::warn;

use crate::endpoints::{
    OK_JSON, PROMPT_WARNING, error_response, failure, json_response, path_rejected, raw_json,
};
use crate::error::{Error, Result};
use crate::model::assignment_draft::{AssignmentDraft, PromptWarning};
use crate::model::view_preference::GroupedQuery;
use crate::preferences::{AssignmentListView, ViewScope, load_view_mode};
use crate::state::SharedState;

pub const NOT_FOUND: &str = "Assignment not found";

/// Parses and validates a create or update body.
fn parse_draft(body: &[u8]) -> Result<(AssignmentDraft, Vec<PromptWarning>)> {
    let draft: AssignmentDraft = serde_json::from_slice(body)
        .map_err(|e| Error::invalid_input(format!("Invalid assignment: {e}")))?;
    let warnings = draft.validate()?;

    for warning in &warnings {
        warn!("Assignment \"{}\": {}", draft.title, warning.message());
    }

    Ok((draft, warnings))
}

fn with_warnings(mut response: Response<Body>, warnings: &[PromptWarning]) -> Response<Body> {
    for warning in warnings {
        response
            .headers_mut()
            .append(PROMPT_WARNING, HeaderValue::from_static(warning.message()));
    }
    response
}

pub async fn list_assignments(State(state): State<SharedState>) -> Response<Body> {
    match state.assignments.list().await {
        Ok(assignments) => json_response(StatusCode::OK, &assignments),
        Err(e) => {
            tracing::error!("Listing assignments failed: {e}");
            failure(&e)
        }
    }
}

/// Assignments grouped by subject. Without `?view=` the stored admin view mode is used.
pub async fn grouped_assignments(
    State(state): State<SharedState>,
    query: std::result::Result<Query<GroupedQuery>, QueryRejection>,
) -> Response<Body> {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!("Rejected grouped view query: {rejection}");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    let view_mode = match query.view {
        Some(mode) => mode,
        None => match load_view_mode(state.preferences.as_ref(), ViewScope::Admin).await {
            Ok(mode) => mode,
            Err(e) => {
                tracing::error!("Loading the view preference failed: {e}");
                return failure(&e);
            }
        },
    };

    match state.assignments.list().await {
        Ok(assignments) => json_response(
            StatusCode::OK,
            &AssignmentListView::new(assignments, view_mode),
        ),
        Err(e) => {
            tracing::error!("Listing assignments failed: {e}");
            failure(&e)
        }
    }
}

pub async fn get_assignment(
    State(state): State<SharedState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Response<Body> {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejected(rejection),
    };

    match state.assignments.get(id).await {
        Ok(Some(assignment)) => json_response(StatusCode::OK, &assignment),
        Ok(None) => {
            warn!("Assignment {id} not found");
            error_response(StatusCode::NOT_FOUND, NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Fetching assignment {id} failed: {e}");
            failure(&e)
        }
    }
}

pub async fn create_assignment(State(state): State<SharedState>, body: Bytes) -> Response<Body> {
    let (draft, warnings) = match parse_draft(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Rejected new assignment: {e}");
            return failure(&e);
        }
    };

    match state.assignments.create(&draft).await {
        Ok(assignment) => with_warnings(json_response(StatusCode::CREATED, &assignment), &warnings),
        Err(e) => {
            tracing::error!("Creating assignment failed: {e}");
            failure(&e)
        }
    }
}

pub async fn update_assignment(
    State(state): State<SharedState>,
    id: std::result::Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Response<Body> {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejected(rejection),
    };

    let (draft, warnings) = match parse_draft(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Rejected update of assignment {id}: {e}");
            return failure(&e);
        }
    };

    match state.assignments.update(id, &draft).await {
        Ok(Some(assignment)) => with_warnings(json_response(StatusCode::OK, &assignment), &warnings),
        Ok(None) => {
            warn!("Assignment {id} not found");
            error_response(StatusCode::NOT_FOUND, NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Updating assignment {id} failed: {e}");
            failure(&e)
        }
    }
}

pub async fn delete_assignment(
    State(state): State<SharedState>,
    id: std::result::Result<Path<i32>, PathRejection>,
) -> Response<Body> {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejected(rejection),
    };

    match state.assignments.delete(id).await {
        Ok(true) => raw_json(StatusCode::OK, OK_JSON.to_string()),
        Ok(false) => {
            warn!("Assignment {id} not found");
            error_response(StatusCode::NOT_FOUND, NOT_FOUND)
        }
        Err(e) => {
            tracing::error!("Deleting assignment {id} failed: {e}");
            failure(&e)
        }
    }
}
