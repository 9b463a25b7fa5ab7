//! Handlers for `/shops` (collection) and `/shop` (single record).

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header::CONTENT_LENGTH, HeaderMap, StatusCode},
    Json,
};
use common::types::MessageBody;
use service::shops::{NewShop, Shop, ShopPatch, ShopValidationError};

use crate::errors::ApiError;
use crate::state::AppState;

/// Raw query pairs; a query string that fails to decode counts as no query.
pub type ShopQuery = Option<Query<Vec<(String, String)>>>;

/// Accept only ids written exactly as a table key: all digits, no leading
/// zeros, fitting in a `u64`.
pub fn parse_shop_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>().ok().filter(|n| n.to_string() == raw)
}

/// First `id` parameter of the query, if it is a valid id.
fn shop_id(query: ShopQuery) -> Option<u64> {
    let Query(params) = query?;
    let (_, raw) = params.into_iter().find(|(k, _)| k == "id")?;
    parse_shop_id(&raw)
}

pub async fn list_shops(State(state): State<AppState>) -> Json<Vec<Shop>> {
    Json(state.shops.list().await)
}

pub async fn get_shop(State(state): State<AppState>, query: ShopQuery) -> Result<Json<Shop>, ApiError> {
    let id = shop_id(query).ok_or(ApiError::ShopNotFound)?;
    state.shops.get(id).await.map(Json).ok_or(ApiError::ShopNotFound)
}

pub async fn create_shop(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    if !headers.contains_key(CONTENT_LENGTH) {
        return Err(ShopValidationError::InvalidBody.into());
    }
    let input = NewShop::from_slice(&body)?;
    let shop = state.shops.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageBody::new("Shop created successfully").with_shop_id(shop.id)),
    ))
}

pub async fn update_shop(
    State(state): State<AppState>,
    query: ShopQuery,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let id = shop_id(query).ok_or(ApiError::ShopNotFound)?;
    if state.shops.get(id).await.is_none() {
        return Err(ApiError::ShopNotFound);
    }
    let patch = ShopPatch::from_slice(&body)?;
    state.shops.update(id, patch).await?;
    Ok(Json(MessageBody::new("Shop updated successfully")))
}

pub async fn delete_all_shops(State(state): State<AppState>) -> Result<Json<MessageBody>, ApiError> {
    state.shops.clear().await?;
    Ok(Json(MessageBody::new("All shops deleted successfully")))
}

pub async fn delete_shop(State(state): State<AppState>, query: ShopQuery) -> Result<Json<MessageBody>, ApiError> {
    let id = shop_id(query).ok_or(ApiError::ShopNotFound)?;
    if !state.shops.delete(id).await? {
        return Err(ApiError::ShopNotFound);
    }
    Ok(Json(MessageBody::new("Shop deleted successfully")))
}
