use std::sync::Arc;

use crate::store::CartStore;

#[derive(Clone)]
pub struct AppState {
    pub cart_store: Arc<CartStore>,
}
