use super::common::{
    created_response, map_service_error, require_json, success_response, validate_input,
};
use crate::{
    entities::item,
    errors::ApiError,
    handlers::AppState,
    services::items::ItemInput,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Request and response DTOs

/// Full item payload; PUT replaces every editable field, so create and
/// update share the same request shape.
#[derive(Debug, Deserialize, Validate)]
pub struct ItemRequest {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,

    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,

    #[serde(default)]
    pub photo: Option<String>,

    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,

    #[validate(range(min = 0, message = "quantity must be non-negative"))]
    pub quantity: i32,

    #[validate(custom = "validate_price")]
    pub price: Decimal,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price must be non-negative"));
    }
    Ok(())
}

impl From<ItemRequest> for ItemInput {
    fn from(request: ItemRequest) -> Self {
        ItemInput {
            code: request.code,
            name: request.name,
            photo: request.photo,
            description: request.description,
            quantity: request.quantity,
            price: request.price,
        }
    }
}

/// Wire representation of an item: exactly the declared fields, nothing
/// from the storage layer beyond the assigned id.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub photo: Option<String>,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<item::Model> for ItemResponse {
    fn from(model: item::Model) -> Self {
        ItemResponse {
            id: model.id,
            code: model.code,
            name: model.name,
            photo: model.photo_url,
            description: model.description,
            quantity: model.quantity,
            price: model.price,
        }
    }
}

// Handler functions

/// Create a new item
async fn create_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = require_json(payload)?;
    validate_input(&payload)?;

    let item = state
        .services
        .items
        .create_item(payload.into())
        .await
        .map_err(map_service_error)?;

    info!("Item created: {}", item.id);

    Ok(created_response(ItemResponse::from(item)))
}

/// List all items
async fn list_items(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .items
        .list_items()
        .await
        .map_err(map_service_error)?;

    let items: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();
    Ok(success_response(items))
}

/// Get an item by ID
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .items
        .get_item(item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ItemResponse::from(item)))
}

/// Update an item, replacing all editable fields
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
    payload: Result<Json<ItemRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = require_json(payload)?;
    validate_input(&payload)?;

    let item = state
        .services
        .items
        .update_item(item_id, payload.into())
        .await
        .map_err(map_service_error)?;

    info!("Item updated: {}", item_id);

    Ok(success_response(ItemResponse::from(item)))
}

/// Delete an item
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .items
        .delete_item(item_id)
        .await
        .map_err(map_service_error)?;

    info!("Item deleted: {}", item_id);

    Ok(success_response(serde_json::json!({
        "message": "Item deleted successfully"
    })))
}

/// Creates the router for item endpoints
pub fn item_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(code: &str, quantity: i32, price: Decimal) -> ItemRequest {
        ItemRequest {
            code: code.to_string(),
            name: "Intel i7".to_string(),
            photo: None,
            description: "desc".to_string(),
            quantity,
            price,
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        assert!(request("CPU001", 10, dec!(299.99)).validate().is_ok());
    }

    #[test]
    fn empty_required_fields_fail_validation() {
        assert!(request("", 10, dec!(299.99)).validate().is_err());

        let mut req = request("CPU001", 10, dec!(299.99));
        req.name = String::new();
        assert!(req.validate().is_err());

        let mut req = request("CPU001", 10, dec!(299.99));
        req.description = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn negative_numbers_fail_validation() {
        assert!(request("CPU001", -1, dec!(299.99)).validate().is_err());
        assert!(request("CPU001", 10, dec!(-0.01)).validate().is_err());
    }

    #[test]
    fn zero_quantity_and_price_are_valid() {
        assert!(request("CPU001", 0, dec!(0)).validate().is_ok());
    }

    #[test]
    fn missing_photo_deserializes_to_none() {
        let req: ItemRequest = serde_json::from_value(serde_json::json!({
            "code": "CPU001",
            "name": "Intel i7",
            "description": "desc",
            "quantity": 10,
            "price": 299.99
        }))
        .expect("payload without photo");
        assert!(req.photo.is_none());
        assert_eq!(req.price, dec!(299.99));
    }

    #[test]
    fn non_numeric_quantity_is_rejected_by_serde() {
        let result: Result<ItemRequest, _> = serde_json::from_value(serde_json::json!({
            "code": "CPU001",
            "name": "Intel i7",
            "description": "desc",
            "quantity": "ten",
            "price": 299.99
        }));
        assert!(result.is_err());
    }

    #[test]
    fn response_projects_declared_fields() {
        let model = item::Model {
            id: Uuid::new_v4(),
            code: "CPU001".to_string(),
            name: "Intel i7".to_string(),
            photo_url: Some("https://example.com/cpu.jpg".to_string()),
            description: "desc".to_string(),
            quantity: 10,
            price: dec!(299.99),
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        let response = ItemResponse::from(model.clone());
        assert_eq!(response.id, model.id);
        assert_eq!(response.photo.as_deref(), Some("https://example.com/cpu.jpg"));

        let value = serde_json::to_value(&response).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["code", "description", "id", "name", "photo", "price", "quantity"]
        );
    }
}
