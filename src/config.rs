//! Configuration loading.
//!
//! Values come from (highest precedence first) environment variables, the TOML file named
//! by `COGNIC_CONFIG` (default `cognic.toml`), then the defaults below. A missing file is
//! not an error.

use std::env::var;
use std::fs::read_to_string;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use tracing::{info, warn};

use crate::error::{Error, Result};

const DEFAULT_CONFIG_PATH: &str = "cognic.toml";

pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub openai: OpenAiConfig,
    pub gmail: GmailConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// PEM certificate; TLS is enabled only when both this and `tls_key` are set.
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
    /// Origin used to resolve relative resource URLs (the mock inbox PDF).
    pub public_origin: String,
    /// Served as the router fallback when present.
    pub static_dir: Option<PathBuf>,
    pub body_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GmailConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Linear scale applied to images before they are sent to the model.
    pub image_scale: f32,
    pub fetch_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9090,
            tls_cert: None,
            tls_key: None,
            public_origin: "http://localhost:9090".to_string(),
            static_dir: None,
            body_limit: 25 * 1024 * 1024,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:9090/api/auth/callback".to_string(),
            scopes: vec![GMAIL_READONLY_SCOPE.to_string()],
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            image_scale: 0.3,
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from the file named by `COGNIC_CONFIG` and the process environment.
    pub fn load() -> Result<Self> {
        let path = var("COGNIC_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|key| var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }

        let raw = read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside of tests.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |target: &mut String, key: &str| {
            if let Some(value) = lookup(key) {
                *target = value;
            }
        };

        set(&mut self.database.user, "PSQL_NAME");
        set(&mut self.database.password, "PSQL_PASS");
        set(&mut self.database.host, "PSQL_HOST");
        set(&mut self.openai.api_key, "OPENAI_API_KEY");
        set(&mut self.openai.model, "OPENAI_MODEL");
        set(&mut self.gmail.client_id, "GMAIL_CLIENT_ID");
        set(&mut self.gmail.client_secret, "GMAIL_CLIENT_SECRET");
        set(&mut self.gmail.redirect_uri, "GMAIL_REDIRECT_URI");

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(e) => warn!("Ignoring invalid PORT value {port}: {e}"),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let scale = self.content.image_scale;
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(Error::Config(format!(
                "content.image_scale must be in (0, 1], got {scale}"
            )));
        }

        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            return Err(Error::Config(
                "server.tls_cert and server.tls_key must be set together".into(),
            ));
        }

        if self.openai.api_key.is_empty() {
            warn!("No OpenAI API key configured, summarization requests will fail");
        }

        if self.gmail.client_id.is_empty() {
            warn!("No Gmail client id configured, the OAuth flow will be rejected by Google");
        }

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("invalid bind address: {e}")))
    }

    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (&self.server.tls_cert, &self.server.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }
}

impl DatabaseConfig {
    /// Credentials are set field by field and never pass through a URL. `host` may end
    /// in `:port`.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .username(&self.user)
            .password(&self.password);

        let host_and_port = self
            .host
            .rsplit_once(':')
            .filter(|(host, _)| !host.contains(':'))
            .and_then(|(host, port)| Some((host, port.parse::<u16>().ok()?)));
        match host_and_port {
            Some((host, port)) => options.host(host).port(port),
            None => options.host(&self.host),
        }
    }
}

impl OpenAiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ContentConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
