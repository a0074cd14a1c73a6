//! Gmail OAuth2 web-server flow and message listing.
//!
//! The flow is two stateless redirects: [`GmailApi::auth_url`] sends the user to Google's
//! consent screen, and the callback hands the returned code to [`GmailApi::exchange_code`].
//! Tokens are not persisted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config::GmailConfig;
use crate::error::{Error, Result};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GMAIL_MESSAGES_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages";

pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Tokens returned after a successful code exchange.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

// Tokens are secrets; keep them out of logs.
impl std::fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,
    pub thread_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MessageList {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

/// Gmail provider port.
#[async_trait]
pub trait GmailApi: Send + Sync {
    fn auth_url(&self) -> Result<String>;

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens>;

    async fn list_messages(&self, access_token: &str, max_results: u32) -> Result<Vec<MessageRef>>;
}

pub struct GoogleGmail {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    scopes: Vec<String>,
}

impl GoogleGmail {
    pub fn new(config: &GmailConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
        })
    }
}

async fn upstream_error(what: &str, resp: reqwest::Response) -> Error {
    let status = resp.status();
    match resp.json::<ErrorResponse>().await {
        Ok(ErrorResponse {
            error,
            error_description,
        }) => Error::upstream(format!(
            "{what} failed ({status}): {error} {}",
            error_description.unwrap_or_default()
        )),
        Err(_) => Error::upstream(format!("{what} failed ({status})")),
    }
}

#[async_trait]
impl GmailApi for GoogleGmail {
    fn auth_url(&self) -> Result<String> {
        let scope = self.scopes.join(" ");
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("access_type", "offline"),
                ("scope", scope.as_str()),
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("could not build consent URL: {e}")))?;

        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let resp = self.http.post(GOOGLE_TOKEN_URL).form(&params).send().await?;
        if !resp.status().is_success() {
            return Err(upstream_error("token exchange", resp).await);
        }

        Ok(resp.json().await?)
    }

    async fn list_messages(&self, access_token: &str, max_results: u32) -> Result<Vec<MessageRef>> {
        let resp = self
            .http
            .get(GMAIL_MESSAGES_URL)
            .bearer_auth(access_token)
            .query(&[("maxResults", max_results)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(upstream_error("message listing", resp).await);
        }

        let list: MessageList = resp.json().await?;
        Ok(list.messages)
    }
}
