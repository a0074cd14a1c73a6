//! Mock mail folders and the per-message summary dispatch.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::pdf::{NO_TEXT_FOUND, PdfExtractor};
use crate::summarize::Summarizer;

pub const INBOX: &str = "Inbox";
pub const DRAFTS: &str = "Drafts";
pub const SENT_ITEMS: &str = "Sent Items";

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const SCANNED_PDF_TEXT: &str = "No text found in the PDF (possibly a scanned document).";
pub const UNSUPPORTED_CONTENT: &str = "Unsupported content type.";

const PROJECT_UPDATE: &str = "Hi Team,

I wanted to update you on the project status. We have completed the initial phase and are \
moving into development. Please ensure all documentation is up-to-date by end of this week.

Best,
John";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageBody {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Embed {
        mime_type: String,
        source_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u32,
    pub subject: String,
    pub from: String,
    pub body: MessageBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageHeader<'a> {
    pub id: u32,
    pub subject: &'a str,
    pub from: &'a str,
}

impl<'a> From<&'a Message> for MessageHeader<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            id: message.id,
            subject: &message.subject,
            from: &message.from,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderSummary {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryKind {
    Summary,
    PdfText,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub kind: SummaryKind,
    pub text: String,
}

#[derive(Debug, Clone)]
struct Folder {
    name: String,
    messages: Vec<Message>,
}

/// Read-only folders of sample messages.
#[derive(Debug, Clone)]
pub struct Mailbox {
    folders: Vec<Folder>,
}

impl Mailbox {
    pub fn sample() -> Self {
        let inbox = vec![
            Message {
                id: 1,
                subject: "Text Email".to_string(),
                from: "john@example.com".to_string(),
                body: MessageBody::Text {
                    text: PROJECT_UPDATE.to_string(),
                },
            },
            Message {
                id: 2,
                subject: "Module 1 Tutorial Question (PDF)".to_string(),
                from: "susan@example.com".to_string(),
                body: MessageBody::Embed {
                    mime_type: PDF_MIME_TYPE.to_string(),
                    source_url: "/Module1TutorialQuestion.pdf".to_string(),
                },
            },
        ];

        Self {
            folders: vec![
                Folder {
                    name: INBOX.to_string(),
                    messages: inbox,
                },
                Folder {
                    name: DRAFTS.to_string(),
                    messages: Vec::new(),
                },
                Folder {
                    name: SENT_ITEMS.to_string(),
                    messages: Vec::new(),
                },
            ],
        }
    }

    pub fn folders(&self) -> Vec<FolderSummary> {
        self.folders
            .iter()
            .map(|f| FolderSummary {
                name: f.name.clone(),
                count: f.messages.len(),
            })
            .collect()
    }

    pub fn folder(&self, name: &str) -> Result<&[Message]> {
        self.folders
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.messages.as_slice())
            .ok_or_else(|| Error::not_found(format!("folder {name}")))
    }

    pub fn message(&self, folder: &str, id: u32) -> Result<&Message> {
        self.folder(folder)?
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::not_found(format!("message {id} in {folder}")))
    }
}

/// Makes a site-relative embed source absolute.
pub fn resolve_source_url(public_origin: &str, source: &str) -> String {
    if source.starts_with("http://") || source.starts_with("https://") {
        return source.to_string();
    }

    let origin = public_origin.trim_end_matches('/');
    if source.starts_with('/') {
        format!("{origin}{source}")
    } else {
        format!("{origin}/{source}")
    }
}

/// Text bodies go to the summarizer, PDF embeds to the extractor, anything else is reported
/// as unsupported.
pub async fn summarize_message(
    message: &Message,
    summarizer: &Summarizer,
    pdf: &PdfExtractor,
    public_origin: &str,
) -> Result<MessageSummary> {
    match &message.body {
        MessageBody::Text { text } => Ok(MessageSummary {
            kind: SummaryKind::Summary,
            text: summarizer.summarize(text).await?,
        }),
        MessageBody::Embed {
            mime_type,
            source_url,
        } if mime_type == PDF_MIME_TYPE => {
            let url = resolve_source_url(public_origin, source_url);
            debug!("Extracting embedded PDF from {url}");

            let text = pdf.extract_text(&url).await?;
            let text = if text.trim().is_empty() || text == NO_TEXT_FOUND {
                SCANNED_PDF_TEXT.to_string()
            } else {
                text
            };

            Ok(MessageSummary {
                kind: SummaryKind::PdfText,
                text,
            })
        }
        MessageBody::Embed { .. } => Ok(MessageSummary {
            kind: SummaryKind::Unsupported,
            text: UNSUPPORTED_CONTENT.to_string(),
        }),
    }
}
