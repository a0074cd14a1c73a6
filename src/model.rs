//! Request and response bodies exchanged with the frontend.

pub mod assignment_draft;
pub mod callback_query;
pub mod json_field;
pub mod render_request;
pub mod simple_response;
pub mod subject_selection;
pub mod view_preference;
