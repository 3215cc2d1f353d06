use axum::http::{HeaderMap, header};
use axum::{Json, Router, body::Bytes, extract::State, routing::any};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::error::RelayError;
use crate::relay::{PromptRequest, RelayService, Reply};

/// Path of the relay endpoint.
pub const RELAY_PATH: &str = "/chatGpt";

pub fn router(service: RelayService) -> Router {
    Router::new()
        .route(RELAY_PATH, any(relay_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serves the relay on `listener` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, service: RelayService) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(
            %addr,
            model = %service.settings().model,
            "relay listening on http://{addr}{RELAY_PATH}"
        );
    }

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

// Any method is accepted and the body is taken as raw bytes, so a GET, a
// malformed payload or a missing content type falls back to the default
// prompt instead of a 4xx.
async fn relay_handler(
    State(service): State<RelayService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Reply>, RelayError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    let request = PromptRequest::from_body(content_type, &body);

    match service.relay(request).await {
        Ok(reply) => Ok(Json(reply)),
        Err(err) => {
            tracing::error!(error = %err, "completion call failed");
            Err(err)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutting down relay");
}
