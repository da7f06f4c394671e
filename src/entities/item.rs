use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inventory item entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Primary key, assigned once at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Item code, unique across the collection
    #[sea_orm(unique)]
    pub code: String,

    /// Display name
    pub name: String,

    /// URL to the item photo
    pub photo_url: Option<String>,

    /// Free-form description
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Units on hand
    pub quantity: i32,

    /// Unit price
    pub price: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
