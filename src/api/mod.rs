//! HTTP interface for the task store.
//!
//! Routes:
//!
//! | Method | Path          | Response                    |
//! |--------|---------------|-----------------------------|
//! | GET    | `/tasks`      | 200, all tasks              |
//! | GET    | `/tasks/{id}` | 200 task, 404               |
//! | POST   | `/tasks`      | 201, created task           |
//! | PUT    | `/tasks/{id}` | 200 updated task, 404       |
//! | DELETE | `/tasks/{id}` | 204, even for unknown ids   |

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    status::{Clock, LocalClock},
    store::{InMemoryTaskStore, TaskStore},
    task::Task,
};

pub use error::{ApiError, ApiErrorResponse};
pub use handlers::{
    create_task, delete_task, get_task, list_tasks, parse_task_id, update_task, TaskBody,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub clock: Arc<dyn Clock>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(InMemoryTaskStore::new(), LocalClock)
    }
}

impl AppState {
    pub fn new(store: impl TaskStore + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            store: Arc::new(store),
            clock: Arc::new(clock),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The outgoing form of a stored task.
    pub fn present(&self, task: Task) -> Task {
        task.with_derived_status(self.today())
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    match listener.local_addr() {
        Ok(local) => tracing::info!("Server running on http://{}", local),
        Err(error) => tracing::warn!(%error, "could not determine local address"),
    }
    serve_on(listener, state).await
}

pub async fn serve_on(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
