pub mod common;
pub mod health;
pub mod items;

use crate::{db::DbPool, services::items::ItemService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub items: Arc<ItemService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            items: Arc::new(ItemService::new(db_pool)),
        }
    }
}
