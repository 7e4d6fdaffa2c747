//! HTTP API
//!
//! ```text
//! GET  /health
//! POST /v1/sessions                 start a stored session
//! GET  /v1/sessions/{id}            replay a stored session
//! POST /v1/sessions/{id}/turns      answer a visitor reply
//! POST /v1/interview/next-turn      stateless turn, caller supplies history
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod schema;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use schema::RequestLimits;

use interview_application::{ConductInterviewUseCase, NextTurnUseCase};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub interview: Arc<ConductInterviewUseCase>,
    pub turns: Arc<NextTurnUseCase>,
    pub limits: RequestLimits,
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, bind: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}
