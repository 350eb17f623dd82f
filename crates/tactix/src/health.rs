//! Liveness endpoint: a plain-text answer on the root path.
//!
//! The only request/response surface the relay exposes. It carries no
//! business logic — load balancers and uptime monitors hit it to confirm
//! the process is alive. Served by a minimal axum router on its own
//! listener, since the WebSocket transport owns the game port.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;

async fn liveness() -> &'static str {
    "tactix relay is running\n"
}

fn router() -> Router {
    Router::new().route("/", get(liveness))
}

/// Serves the liveness router until the process exits.
pub(crate) async fn serve(listener: TcpListener) {
    if let Err(e) = axum::serve(listener, router()).await {
        tracing::error!(error = %e, "liveness endpoint terminated");
    }
}
