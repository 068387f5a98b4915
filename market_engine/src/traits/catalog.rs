use thiserror::Error;

use crate::db_types::{ProductId, ProductSnapshot, ShopSnapshot, UserId};

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Catalog database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Read-only view of the external product/shop catalog.
///
/// The engine consults it exactly at order-creation time: to confirm the buyer exists, to resolve
/// the product with its owning shop, and to capture the snapshot fields. Moderation state is part
/// of the answer; the engine never writes any of it.
#[allow(async_fn_in_trait)]
pub trait CatalogReader {
    /// Whether the given user id is known to the identity/user table.
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, CatalogError>;

    /// Resolve a product together with its owning shop, or `None` if either is missing.
    async fn product_by_id(&self, product_id: &ProductId) -> Result<Option<ProductSnapshot>, CatalogError>;

    /// The shop owned by the given user. Each user owns at most one shop.
    async fn shop_for_user(&self, user_id: &UserId) -> Result<Option<ShopSnapshot>, CatalogError>;
}
