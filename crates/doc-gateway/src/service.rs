//! Gateway service - serves the HTTP API and runs the retention sweep.

use crate::domain::config::{GatewayConfig, RetentionConfig};
use crate::domain::error::GatewayError;
use crate::middleware::GatewayMetrics;
use crate::router::build_router;
use axum::Router;
use doc_store::DocumentApi;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// Document gateway service
pub struct GatewayService {
    config: GatewayConfig,
    documents: Arc<dyn DocumentApi>,
    metrics: Arc<GatewayMetrics>,
}

impl GatewayService {
    /// Create a new gateway over `documents`.
    pub fn new(config: GatewayConfig, documents: Arc<dyn DocumentApi>) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        Ok(Self {
            config,
            documents,
            metrics: Arc::new(GatewayMetrics::new()),
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get metrics
    pub fn metrics(&self) -> Arc<GatewayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        build_router(
            Arc::clone(&self.documents),
            Arc::clone(&self.metrics),
            &self.config.limits,
        )
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, GatewayError> {
        let addr = self.config.http_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })
    }

    /// Serve until `signal` resolves, then drain connections.
    ///
    /// Open connections get `http.shutdown_grace` to finish before they are
    /// dropped. The retention task, if enabled, stops with the server.
    pub async fn run<F>(&self, listener: TcpListener, signal: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let retention = self.config.retention.enabled.then(|| {
            spawn_retention_task(
                Arc::clone(&self.documents),
                Arc::clone(&self.metrics),
                &self.config.retention,
                shutdown_rx.clone(),
            )
        });

        if let Ok(addr) = listener.local_addr() {
            info!(addr = %addr, "Document gateway listening");
        }

        let server = axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                signal.await;
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(true);
            })
            .into_future();

        let grace = self.config.http.shutdown_grace;
        let mut grace_rx = shutdown_rx;
        let deadline = async move {
            if grace_rx.changed().await.is_ok() {
                tokio::time::sleep(grace).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        let result = tokio::select! {
            result = server => result.map_err(GatewayError::from),
            _ = deadline => {
                warn!(grace_secs = grace.as_secs(), "Shutdown grace period elapsed, dropping open connections");
                Ok(())
            }
        };

        if let Some(handle) = retention {
            if let Err(e) = handle.await {
                error!(error = %e, "Retention task failed");
            }
        }

        info!("Document gateway stopped");
        result
    }
}

/// Spawn the periodic retention sweep.
///
/// The first sweep runs one `interval` after start. The task exits when
/// `shutdown` flips to `true` or its sender is dropped, and at once if
/// `interval` cannot be scheduled.
pub fn spawn_retention_task(
    documents: Arc<dyn DocumentApi>,
    metrics: Arc<GatewayMetrics>,
    retention: &RetentionConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = retention.interval;
    let max_age = retention.max_age;

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            max_age_secs = max_age.as_secs(),
            "Retention sweep scheduled"
        );
        let Some(first_tick) = Instant::now().checked_add(interval) else {
            error!(interval_secs = interval.as_secs(), "Retention interval out of range, sweep disabled");
            return;
        };
        let mut ticker = tokio::time::interval_at(first_tick, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            let docs = Arc::clone(&documents);
            match tokio::task::spawn_blocking(move || docs.sweep_expired(max_age)).await {
                Ok(Ok(removed)) => metrics.record_swept(removed),
                Ok(Err(e)) => warn!(error = %e, "Retention sweep failed"),
                Err(e) => error!(error = %e, "Retention sweep task panicked"),
            }
        }

        info!("Retention sweep stopped");
    })
}
