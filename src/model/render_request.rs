use serde::{Deserialize, Serialize};

use crate::mention::{Resolved, Suggestion};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub text: String,
}

/// The views of a prompt: its spans, the text sent to the model, the text shown to readers
/// and the resolved preview. `suggestions` lists the templates the picker can insert.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub segments: Vec<Resolved>,
    pub expanded: String,
    pub display: String,
    pub preview: String,
    pub suggestions: Vec<Suggestion>,
}
