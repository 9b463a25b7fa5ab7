use std::sync::Arc;

use service::shops::ShopRepository;

/// Shared handler state: the shop table, injected at startup.
#[derive(Clone)]
pub struct AppState {
    pub shops: Arc<dyn ShopRepository>,
}

impl AppState {
    pub fn new(shops: Arc<dyn ShopRepository>) -> Self {
        Self { shops }
    }
}
