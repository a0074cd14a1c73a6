use serde::Deserialize;

/// Query string Google appends when redirecting back after consent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}
