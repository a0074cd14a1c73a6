use serde::{Deserialize, Serialize};

use crate::subject::{Selection, Subject};

/// A subject change on the assignment form. `confirmed` is the user's answer to the
/// discard question, given up front.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubjectSelectRequest {
    pub subject: Option<Subject>,
    pub prompt: String,
    pub next: Option<Subject>,
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSelectResponse {
    pub selection: Selection,
    pub subject: Option<Subject>,
    pub prompt: String,
    pub expanded_prompt: String,
    /// The question that had to be answered, when one was asked.
    pub question: Option<&'static str>,
}
