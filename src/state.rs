use std::sync::Arc;

use crate::assignment::store::AssignmentStore;
use crate::config::Config;
use crate::gmail::GmailApi;
use crate::inbox::Mailbox;
use crate::pdf::PdfExtractor;
use crate::preferences::PreferenceStore;
use crate::summarize::Summarizer;

/// Everything a route handler needs, shared behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub assignments: Arc<dyn AssignmentStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub summarizer: Summarizer,
    pub pdf: PdfExtractor,
    pub gmail: Arc<dyn GmailApi>,
    pub mailbox: Mailbox,
}

pub type SharedState = Arc<AppState>;
