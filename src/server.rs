//! HTTP endpoint for question answering.
//!
//! ## Endpoints
//!
//! - `POST /api/request`: body `{"id": <int>, "query": <string>}`, returns
//!   the [`FinalAnswer`] JSON

use crate::answer::FinalAnswer;
use crate::config::ServerConfig;
use crate::error::{BotError, Result};
use crate::pipeline::{AnswerService, Query};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use quizbot_search::{PageFetcher, SearchBackend};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{Instrument, info};
use uuid::Uuid;

/// Error body returned when no answer could be produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Search(_) => StatusCode::BAD_GATEWAY,
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router for `service`.
pub fn router<B, F>(service: Arc<AnswerService<B, F>>) -> Router
where
    B: SearchBackend + 'static,
    F: PageFetcher + 'static,
{
    Router::new()
        .route("/api/request", post(handle_request::<B, F>))
        .with_state(service)
}

/// `POST /api/request`.
///
/// A disconnecting client drops this future, which aborts the pipeline.
async fn handle_request<B, F>(
    State(service): State<Arc<AnswerService<B, F>>>,
    Json(query): Json<Query>,
) -> std::result::Result<Json<FinalAnswer>, BotError>
where
    B: SearchBackend + 'static,
    F: PageFetcher + 'static,
{
    let span = tracing::info_span!("request", request_id = %Uuid::new_v4());
    match service.answer(&query).instrument(span).await {
        Ok(answer) => Ok(Json(answer)),
        Err(err) => {
            tracing::error!(query_id = query.id, error = %err, "request failed");
            Err(err)
        }
    }
}

/// The question-answering HTTP server.
///
/// Serves in a background tokio task; dropping the server stops it.
pub struct AnswerServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl AnswerServer {
    /// Bind to `{config.host}:{config.port}` (port `0` auto-assigns) and
    /// start serving.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Server`] if the listener cannot bind.
    pub async fn start<B, F>(
        service: Arc<AnswerService<B, F>>,
        config: &ServerConfig,
    ) -> Result<Self>
    where
        B: SearchBackend + 'static,
        F: PageFetcher + 'static,
    {
        let app = router(service);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| BotError::Server(format!("bind to {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| BotError::Server(format!("failed to get local addr: {e}")))?;

        info!("answer server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("answer server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for AnswerServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
