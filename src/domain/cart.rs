//! Cart and product read models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog product (read-only here)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price in the smallest currency unit
    pub price_cents: i64,
}

/// One row of a user's cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub prod_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Cart row joined with its product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartEntry {
    pub cart_id: Uuid,
    pub product: Product,
}
