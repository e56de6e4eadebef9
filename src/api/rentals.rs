//! Rental Endpoints
//!
//! Gateway bindings for rental transactions, including the return action.

use reqwest::Method;

use crate::models::{CreateRentalRequest, Rental, RentalStatus, UpdateRentalRequest};

use super::{delete, get_json, post_json, send_json, ApiError};

pub async fn list_rentals(status: Option<RentalStatus>) -> Result<Vec<Rental>, ApiError> {
    let path = match status {
        Some(status) => format!("/rentals?status={}", status.as_query()),
        None => "/rentals".to_string(),
    };
    get_json(&path).await
}

pub async fn create_rental(req: &CreateRentalRequest) -> Result<Rental, ApiError> {
    send_json(Method::POST, "/rentals", req).await
}

/// Full metadata update (renter, contact, expected return, notes).
pub async fn update_rental(id: u32, req: &UpdateRentalRequest) -> Result<Rental, ApiError> {
    send_json(Method::PUT, &format!("/rentals/{id}"), req).await
}

/// Partial update; unset fields are left untouched server-side.
pub async fn patch_rental(id: u32, req: &UpdateRentalRequest) -> Result<Rental, ApiError> {
    send_json(Method::PATCH, &format!("/rentals/{id}"), req).await
}

pub async fn delete_rental(id: u32) -> Result<(), ApiError> {
    delete(&format!("/rentals/{id}")).await
}

/// Marks the rental returned. The server sets status and return timestamp
/// and restores the item's stock.
pub async fn return_rental(id: u32) -> Result<Rental, ApiError> {
    post_json(&format!("/rentals/{id}/return")).await
}
