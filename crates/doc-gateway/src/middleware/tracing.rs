//! Request span and metrics middleware.
//!
//! Wraps each request in an `api_request` span carrying method, path and
//! document id, records the response status on the span, and feeds
//! `GatewayMetrics`.

use crate::middleware::metrics::{GatewayMetrics, RequestTimer};
use axum::{body::Body, http::Method, http::Request, response::Response};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, info_span, Instrument, Span};

/// Tracing layer that creates spans for each request
#[derive(Clone)]
pub struct TracingLayer {
    metrics: Arc<GatewayMetrics>,
}

impl TracingLayer {
    pub fn new(metrics: Arc<GatewayMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService {
            inner,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
    metrics: Arc<GatewayMetrics>,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let doc_id = req.uri().query().and_then(id_from_query).unwrap_or("");

        let span = info_span!(
            "api_request",
            http.method = %method,
            http.target = %path,
            doc.id = %doc_id,
            http.status_code = tracing::field::Empty,
        );

        let timer = RequestTimer::new(Arc::clone(&self.metrics), method == Method::POST);

        Box::pin(
            async move {
                let result = inner.call(req).await;

                match &result {
                    Ok(response) => {
                        let status = response.status();
                        Span::current().record("http.status_code", status.as_u16());
                        debug!(status = status.as_u16(), "request complete");
                        timer.finish(status.is_success());
                    }
                    Err(_) => timer.finish(false),
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Raw value of the `id` query parameter, if present.
fn id_from_query(query: &str) -> Option<&str> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("id="))
}
