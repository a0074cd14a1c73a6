//! Fetches a PDF by URL and extracts its text.
//!
//! Scanned or image-only PDFs have no extractable text; they produce [`NO_TEXT_FOUND`]
//! rather than an error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const NO_TEXT_FOUND: &str = "No text found.";

#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub status: StatusCode,
    /// Declared content type, empty when the header is absent.
    pub content_type: String,
    /// Body bytes; left empty for non-success responses.
    pub bytes: Vec<u8>,
}

/// Outbound fetch port.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

/// PDF parsing port. Runs on the blocking pool.
pub trait PdfParser: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}

pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = if status.is_success() {
            resp.bytes().await?.to_vec()
        } else {
            Vec::new()
        };

        Ok(FetchedResource {
            status,
            content_type,
            bytes,
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractParser;

impl PdfParser for PdfExtractParser {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| Error::upstream_parse(e.to_string()))
    }
}

#[derive(Clone)]
pub struct PdfExtractor {
    fetcher: Arc<dyn ResourceFetcher>,
    parser: Arc<dyn PdfParser>,
}

impl PdfExtractor {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, parser: Arc<dyn PdfParser>) -> Self {
        Self { fetcher, parser }
    }

    pub async fn extract_text(&self, pdf_url: &str) -> Result<String> {
        let resource = self.fetcher.fetch(pdf_url).await?;

        if !resource.status.is_success() {
            return Err(Error::upstream_fetch(resource.status));
        }

        if !resource.content_type.to_lowercase().contains("pdf") {
            return Err(Error::ContentType {
                found: resource.content_type,
            });
        }

        debug!("Parsing {} bytes from {pdf_url}", resource.bytes.len());

        let parser = self.parser.clone();
        let text = tokio::task::spawn_blocking(move || parser.extract_text(&resource.bytes))
            .await
            .map_err(|e| Error::upstream_parse(format!("PDF parser stopped: {e}")))??;

        if text.trim().is_empty() {
            info!("{pdf_url} has no extractable text");
            return Ok(NO_TEXT_FOUND.to_string());
        }

        Ok(text)
    }
}
