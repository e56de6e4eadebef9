//! Item Endpoints
//!
//! Gateway bindings for the loanable-item collection.

use reqwest::Method;

use crate::models::{CreateItemRequest, Item, UpdateItemRequest};

use super::{delete, get_json, send_json, ApiError};

pub async fn list_items() -> Result<Vec<Item>, ApiError> {
    get_json("/items").await
}

pub async fn get_item(id: u32) -> Result<Item, ApiError> {
    get_json(&format!("/items/{id}")).await
}

pub async fn create_item(req: &CreateItemRequest) -> Result<Item, ApiError> {
    send_json(Method::POST, "/items", req).await
}

/// Full metadata update. Stock stays whatever it was at creation.
pub async fn update_item(id: u32, req: &UpdateItemRequest) -> Result<Item, ApiError> {
    send_json(Method::PUT, &format!("/items/{id}"), req).await
}

/// Partial update; unset fields are left untouched server-side.
pub async fn patch_item(id: u32, req: &UpdateItemRequest) -> Result<Item, ApiError> {
    send_json(Method::PATCH, &format!("/items/{id}"), req).await
}

pub async fn delete_item(id: u32) -> Result<(), ApiError> {
    delete(&format!("/items/{id}")).await
}
