use crate::{
    entities::{item, Item},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service owning the canonical item collection
#[derive(Clone)]
pub struct ItemService {
    db: Arc<DatabaseConnection>,
}

impl ItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new item with a freshly assigned id
    #[instrument(skip(self))]
    pub async fn create_item(&self, input: ItemInput) -> Result<item::Model, ServiceError> {
        self.ensure_unique_code(&input.code, None).await?;

        let item_id = Uuid::new_v4();
        let now = Utc::now();

        let item = item::ActiveModel {
            id: Set(item_id),
            code: Set(input.code.clone()),
            name: Set(input.name.clone()),
            photo_url: Set(input.photo.clone()),
            description: Set(input.description.clone()),
            quantity: Set(input.quantity),
            price: Set(input.price),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let item = item.insert(&*self.db).await?;

        info!("Created item: {}", item_id);
        Ok(item)
    }

    /// Get an item by ID
    #[instrument(skip(self))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        Item::find_by_id(item_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))
    }

    /// List all items in persistence order
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        Item::find()
            .order_by_asc(item::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(Into::into)
    }

    /// Replace all editable fields of an existing item
    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: ItemInput,
    ) -> Result<item::Model, ServiceError> {
        self.ensure_unique_code(&input.code, Some(item_id)).await?;

        let item = self.get_item(item_id).await?;
        let mut active: item::ActiveModel = item.into();

        active.code = Set(input.code.clone());
        active.name = Set(input.name.clone());
        active.photo_url = Set(input.photo.clone());
        active.description = Set(input.description.clone());
        active.quantity = Set(input.quantity);
        active.price = Set(input.price);
        active.updated_at = Set(Some(Utc::now()));

        let item = active.update(&*self.db).await?;
        info!("Updated item: {}", item_id);
        Ok(item)
    }

    /// Remove an item permanently
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let item = self.get_item(item_id).await?;
        item.delete(&*self.db).await?;

        info!("Deleted item: {}", item_id);
        Ok(())
    }

    /// Reject a code already held by another item. Duplicates surface as a
    /// deterministic conflict; the unique index on `code` backs this up for
    /// racing writes.
    async fn ensure_unique_code(
        &self,
        code: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let mut query = Item::find().filter(item::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            query = query.filter(item::Column::Id.ne(id));
        }

        if query.one(&*self.db).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Item code {} already exists",
                code
            )));
        }

        Ok(())
    }
}

/// Full field set for creating or replacing an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInput {
    pub code: String,
    pub name: String,
    pub photo: Option<String>,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
}
