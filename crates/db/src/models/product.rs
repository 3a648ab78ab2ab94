//! Product entity model and DTOs.
//!
//! Kind-specific attributes are stored as JSON in `extra`; see
//! [`thrush_core::product::ProductDetails`] for the accepted shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::error::CoreError;
use thrush_core::product::ProductDetails;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub seller_id: DbId,
    pub category_id: DbId,
    pub name: String,
    pub description: String,
    pub product_code: String,
    pub image: Option<String>,
    pub kind: String,
    pub extra: serde_json::Value,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Product);
thrush_core::impl_soft_deletable!(Product, "products");

impl PermissionBearing for Product {
    const MODEL_NAME: &'static str = "product";
}

impl Product {
    /// Decode the stored `(kind, extra)` pair.
    pub fn details(&self) -> Result<ProductDetails, CoreError> {
        ProductDetails::from_parts(&self.kind, self.extra.clone())
    }
}

/// DTO for creating a new product. The seller comes from the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub category_id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub product_code: String,
    pub image: Option<String>,
    pub details: ProductDetails,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub kind: Option<String>,
    pub category_id: Option<DbId>,
}
