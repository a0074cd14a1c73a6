//! Routes message content to the language model.
//!
//! Image data URIs are downscaled and described; everything else is summarized as text.
//! Each call is a single attempt; failures surface immediately.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub mod openai;
pub mod resize;

pub const IMAGE_DATA_PREFIX: &str = "data:image/";

pub const SUMMARY_SYSTEM_PROMPT: &str = "\
You are a helpful assistant focusing on summarizing emails. Produce a concise yet complete \
summary that captures every critical point, request and relevant detail of the email.

If the email is only 20-30 words long, you may simply repeat it as the summary.

Length: around 100-150 words, without losing key details.

Clarity and organization: open with one or two sentences stating the purpose of the email, \
then use bullet points or short paragraphs for the important points, requests, deadlines \
and questions.

Accuracy: include every significant detail without distorting its meaning. Do not add \
information or assume details that are not provided.

Tone: neutral and professional, with no personal opinions or extra commentary.

Action items: clearly list follow-up steps, responsibilities and deadlines required by the \
sender.

Close with one line stating the overall intention of the email (a request for a response, \
a confirmation, a reminder).";

pub const IMAGE_SYSTEM_PROMPT: &str = "\
You are a helpful assistant that describes images attached to emails. Describe what the \
image shows, transcribe any legible text, and point out anything the recipient is likely \
expected to act on.";

pub const IMAGE_INSTRUCTION: &str = "Describe this image.";

/// What is sent to the model as the user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum UserContent {
    Text(String),
    Image {
        instruction: String,
        data_uri: String,
    },
}

/// Chat completion port.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, system: &str, user: UserContent) -> Result<String>;
}

/// Image downscaling port. Takes and returns a `data:` URI.
#[async_trait]
pub trait ImageResizer: Send + Sync {
    async fn downscale(&self, data_uri: &str, scale: f32) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Text,
}

impl ContentKind {
    pub fn of(content: &str) -> Self {
        if content.starts_with(IMAGE_DATA_PREFIX) {
            Self::Image
        } else {
            Self::Text
        }
    }
}

#[derive(Clone)]
pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    resizer: Arc<dyn ImageResizer>,
    image_scale: f32,
}

impl Summarizer {
    pub fn new(model: Arc<dyn ChatModel>, resizer: Arc<dyn ImageResizer>, image_scale: f32) -> Self {
        Self {
            model,
            resizer,
            image_scale,
        }
    }

    /// Accepts the raw `emailContent` value of a request, which must be a non-empty string.
    pub async fn summarize_value(&self, content: Option<&Value>) -> Result<String> {
        match content {
            Some(Value::String(content)) => self.summarize(content).await,
            Some(_) => Err(Error::invalid_input("content must be a string")),
            None => Err(Error::invalid_input("content is missing")),
        }
    }

    pub async fn summarize(&self, content: &str) -> Result<String> {
        if content.is_empty() {
            return Err(Error::invalid_input("content is empty"));
        }

        match ContentKind::of(content) {
            ContentKind::Image => self.describe_image(content).await,
            ContentKind::Text => self.summarize_text(content).await,
        }
    }

    async fn summarize_text(&self, text: &str) -> Result<String> {
        debug!("Summarizing {} bytes of text", text.len());
        let user = UserContent::Text(format!("Email Content:\n{text}\n"));
        let summary = self
            .model
            .complete(SUMMARY_SYSTEM_PROMPT, user)
            .await
            .map_err(into_upstream)?;

        Ok(summary.trim().to_string())
    }

    async fn describe_image(&self, data_uri: &str) -> Result<String> {
        let data_uri = match self.resizer.downscale(data_uri, self.image_scale).await {
            Ok(scaled) => {
                debug!("Downscaled image from {} to {} bytes", data_uri.len(), scaled.len());
                scaled
            }
            Err(e) => {
                warn!("Could not downscale image, sending original: {e}");
                data_uri.to_string()
            }
        };

        let user = UserContent::Image {
            instruction: IMAGE_INSTRUCTION.to_string(),
            data_uri,
        };

        self.model
            .complete(IMAGE_SYSTEM_PROMPT, user)
            .await
            .map_err(into_upstream)
    }
}

fn into_upstream(e: Error) -> Error {
    match e {
        Error::Upstream(_) => e,
        other => Error::upstream(other.to_string()),
    }
}
