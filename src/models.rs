//! Domain Models
//!
//! Data structures mirroring the gateway's wire format (camelCase JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a rental. The server owns every transition; the client only
/// reflects what it is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalStatus {
    Ongoing,
    Completed,
    Overdue,
}

impl RentalStatus {
    /// Wire form, also used for the `?status=` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            RentalStatus::Ongoing => "ONGOING",
            RentalStatus::Completed => "COMPLETED",
            RentalStatus::Overdue => "OVERDUE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RentalStatus::Ongoing => "Ongoing",
            RentalStatus::Completed => "Returned",
            RentalStatus::Overdue => "Overdue",
        }
    }
}

/// A loanable item. `available` is an intent flag set by staff and is
/// independent of `stock`: an item can sit in stock while withdrawn from loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub description: String,
    pub available: bool,
    pub stock: u32,
    pub total_stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A rental transaction. `return_date` is present exactly when the status is
/// `Completed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: u32,
    pub item_id: u32,
    pub item_name: String,
    pub renter_name: String,
    pub renter_contact: String,
    pub status: RentalStatus,
    pub rental_date: DateTime<Utc>,
    pub expected_return_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ========================
// Request Payloads
// ========================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub category: String,
    pub description: String,
    pub stock: u32,
}

/// Partial item update. Stock is immutable after creation, so it has no slot
/// here.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalRequest {
    pub item_id: u32,
    pub renter_name: String,
    pub renter_contact: String,
    pub expected_return_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial rental metadata update.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRentalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renter_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_return_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Outcome of a list fetch, kept separate from the data itself so the view
/// can tell "no data" from "fetch failed" and offer a retry.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable {
    Loading,
    Ready,
    Failed(String),
}

impl Loadable {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_status_wire_form() {
        let json = serde_json::to_string(&RentalStatus::Ongoing).expect("serialize status");
        assert_eq!(json, "\"ONGOING\"");

        let status: RentalStatus =
            serde_json::from_str("\"OVERDUE\"").expect("deserialize status");
        assert_eq!(status, RentalStatus::Overdue);
    }

    #[test]
    fn test_rental_wire_names_are_camel_case() {
        let raw = r#"{
            "id": 3,
            "itemId": 7,
            "itemName": "Umbrella",
            "renterName": "Kim",
            "renterContact": "kim@example.com",
            "status": "COMPLETED",
            "rentalDate": "2026-07-01T09:00:00Z",
            "expectedReturnDate": "2026-07-08T23:59:59Z",
            "returnDate": "2026-07-05T17:30:00Z"
        }"#;
        let rental: Rental = serde_json::from_str(raw).expect("deserialize rental");
        assert_eq!(rental.item_name, "Umbrella");
        assert_eq!(rental.status, RentalStatus::Completed);
        assert!(rental.return_date.is_some());
        assert_eq!(rental.notes, None);
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let req = UpdateRentalRequest {
            notes: Some("left at front desk".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&req).expect("serialize request");
        assert_eq!(json, r#"{"notes":"left at front desk"}"#);
    }
}
