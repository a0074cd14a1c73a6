use serde::{Deserialize, Serialize};

use crate::preferences::ViewMode;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPreference {
    pub view_mode: ViewMode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupedQuery {
    pub view: Option<ViewMode>,
}
