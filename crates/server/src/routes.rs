pub mod shops;

use axum::{
    extract::State,
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::{Health, MessageBody};

use crate::errors::ApiError;
use crate::state::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Fallback for unknown paths and for known paths hit with an unsupported method.
pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

/// Router-level fallback. `DELETE` on any path beginning with `/shops`
/// clears the table; everything else is an unknown endpoint.
pub async fn unmatched(
    state: State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Json<MessageBody>, ApiError> {
    if method == Method::DELETE && uri.path().starts_with("/shops") {
        return shops::delete_all_shops(state).await;
    }
    Err(ApiError::EndpointNotFound)
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let shop_routes = Router::new()
        .route(
            "/shops",
            get(shops::list_shops)
                .delete(shops::delete_all_shops)
                .fallback(endpoint_not_found),
        )
        .route(
            "/shop",
            get(shops::get_shop)
                .post(shops::create_shop)
                .put(shops::update_shop)
                .delete(shops::delete_shop)
                .fallback(endpoint_not_found),
        );

    Router::new()
        .route("/health", get(health).fallback(endpoint_not_found))
        .merge(shop_routes)
        .fallback(unmatched)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
