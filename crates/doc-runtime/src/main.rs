//! # Document Runtime
//!
//! Entry point for the tabular JSON document store.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load `GatewayConfig` from the environment and validate it
//! 3. Open the data directory (fatal on failure)
//! 4. Seed the `demo` document if absent
//! 5. Bind the HTTP listener and serve, with the retention sweep alongside
//!
//! ## Shutdown Sequence
//!
//! Ctrl-C or SIGTERM stops accepting connections; open requests get the
//! configured grace period to finish.

mod demo;

use std::sync::Arc;

use anyhow::{Context, Result};
use doc_gateway::{GatewayConfig, GatewayService};
use doc_store::{DocumentService, FileDocumentStore};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = GatewayConfig::from_env();
    config.validate().context("invalid configuration")?;

    info!(
        version = doc_gateway::VERSION,
        addr = %config.http_addr(),
        data_dir = %config.storage.data_dir.display(),
        max_keys = config.limits.max_keys_per_object,
        max_upload_mb = config.limits.max_upload_size_mb,
        normalize_uploads = config.storage.normalize_uploads,
        retention = config.retention.enabled,
        "Starting document store"
    );

    let store = FileDocumentStore::open(&config.storage.data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            config.storage.data_dir.display()
        )
    })?;
    let documents = Arc::new(DocumentService::new(
        store,
        config.limits.validation_limits(),
        config.storage.normalize_uploads,
    ));

    if config.storage.seed_demo {
        if let Err(e) = demo::seed_demo(&*documents) {
            warn!(error = %e, "Demo document not created");
        }
    }

    let gateway = GatewayService::new(config, documents).context("failed to build gateway")?;
    let listener = gateway
        .bind()
        .await
        .context("failed to bind HTTP listener")?;

    gateway
        .run(listener, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Shutdown complete");
    Ok(())
}
