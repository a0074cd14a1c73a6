use std::sync::Arc;
use std::time::Duration;

use axum_server::{Handle, tls_rustls::RustlsConfig};
use tokio::signal;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::assignment::store::AssignmentStore;
use crate::config::Config;
use crate::database::assignment::PgAssignmentStore;
use crate::database::preferences::PgPreferenceStore;
use crate::error::Result;
use crate::gmail::GoogleGmail;
use crate::inbox::Mailbox;
use crate::pdf::{HttpFetcher, PdfExtractParser, PdfExtractor};
use crate::preferences::PreferenceStore;
use crate::state::AppState;
use crate::summarize::Summarizer;
use crate::summarize::openai::OpenAiClient;
use crate::summarize::resize::ImageCrateResizer;

mod assignment;
mod config;
mod database;
mod endpoints;
mod error;
mod gmail;
mod inbox;
mod mention;
mod model;
mod pdf;
mod preferences;
mod state;
mod subject;
mod summarize;

/// How long in-flight requests get to finish once a shutdown signal arrives.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    // Begin logging
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // The process-wide provider must be chosen before any TLS config is built
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = Config::load()?;

    // Initialize the database, aborting start-up if an error occurs
    let pool = database::init_database(&config.database).await?;
    info!("Database initialized");

    let assignments: Arc<dyn AssignmentStore> = Arc::new(PgAssignmentStore::new(pool.clone()));
    let preferences: Arc<dyn PreferenceStore> = Arc::new(PgPreferenceStore::new(pool));

    let summarizer = Summarizer::new(
        Arc::new(OpenAiClient::new(&config.openai)?),
        Arc::new(ImageCrateResizer),
        config.content.image_scale,
    );
    let pdf = PdfExtractor::new(
        Arc::new(HttpFetcher::new(config.content.fetch_timeout())?),
        Arc::new(PdfExtractParser),
    );
    let gmail = Arc::new(GoogleGmail::new(&config.gmail, config.content.fetch_timeout())?);

    let address = config.bind_address()?;
    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_path_buf(), key.to_path_buf()));
    let static_dir = config.server.static_dir.clone();

    let state = Arc::new(AppState {
        config,
        assignments,
        preferences,
        summarizer,
        pdf,
        gmail,
        mailbox: Mailbox::sample(),
    });

    let app = endpoints::router(state);

    // Static assets (including the sample PDF) are served for anything the API does not match
    let app = match static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            app.fallback_service(ServeDir::new(dir))
        }
        None => app,
    };

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    match tls_paths {
        Some((cert, key)) => {
            // Load the certificate for HTTPS
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!("Listening on https://{address}");
            axum_server::bind_rustls(address, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("Listening on http://{address}");
            axum_server::bind(address)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
