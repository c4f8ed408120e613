use crate::config::PrintConfig;
use crate::handlers;
use crate::services::{CommandConverter, CommandDispatcher, Converter, Dispatcher, PrintPipeline};
use crate::workers::ArtifactReaper;
use axum::middleware::from_fn;
use axum::{routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware, tracing::REQUEST_ID_HEADER,
};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PrintPipeline>,
}

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
    shutdown_token: CancellationToken,
}

impl Application {
    /// Builds the application with the command-backed converter and
    /// dispatcher described by `config`.
    pub async fn build(config: PrintConfig) -> Result<Self, AppError> {
        let converter = CommandConverter::from_config(&config.pipeline)?;
        let dispatcher = CommandDispatcher::from_config(&config.pipeline)?;
        Self::build_with(config, Arc::new(converter), Arc::new(dispatcher)).await
    }

    pub async fn build_with(
        config: PrintConfig,
        converter: Arc<dyn Converter>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> Result<Self, AppError> {
        let tmp_dir = config.pipeline.tmp_dir.clone();
        tokio::fs::create_dir_all(&tmp_dir).await.map_err(|e| {
            tracing::error!(
                "Failed to create temp directory {}: {}",
                tmp_dir.display(),
                e
            );
            AppError::from(e)
        })?;

        let pipeline = PrintPipeline::new(
            tmp_dir.clone(),
            config.pipeline.cleanup,
            converter,
            dispatcher,
        );

        let state = AppState {
            pipeline: Arc::new(pipeline),
        };

        let shutdown_token = CancellationToken::new();
        let reaper = ArtifactReaper::new(tmp_dir, &config.reaper, shutdown_token.child_token());
        tokio::spawn(reaper.start());

        let app = router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let token = shutdown_token.clone();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move { token.cancelled().await });

        Ok(Self {
            port,
            server: Box::pin(server.into_future()),
            shutdown_token,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Cancelling this token stops the reaper and drains the HTTP server.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let result = self.server.await;
        self.shutdown_token.cancel();
        result
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/print/:number", get(handlers::print_number))
        .fallback(handlers::route_not_found)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        // outside the trace layer so generated ids reach the span
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
