use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::shops::ShopStore;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the shop table named by the config into a fresh handler state.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    common::env::ensure_data_dir(&cfg.storage.data_file).await?;
    let store = ShopStore::open(&cfg.storage.data_file).await?;
    Ok(AppState::new(store))
}

/// Router with CORS and request tracing applied.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let listener = TcpListener::bind(cfg.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, data_file = %cfg.storage.data_file.display(), "starting shop service");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(%addr, "shop service stopped");
    Ok(())
}

/// Serve an already-built state on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

