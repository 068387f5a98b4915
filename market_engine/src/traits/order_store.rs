use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatus, ShopId, UserId},
    order_objects::OrderRecord,
};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Durable order storage. The sole writer of order state in the system.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Insert the order and its single snapshot item in one all-or-nothing transaction.
    ///
    /// On any storage failure the transaction is rolled back in full: no `Order` or `OrderItem`
    /// row is ever left partially written.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrderStoreError>;

    /// Load an order with its item and the item's shop owner id. `None` if the order does not
    /// exist, has no item, or its shop has vanished from the catalog.
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError>;

    /// All orders placed by the given buyer, in store-defined order.
    async fn orders_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<OrderRecord>, OrderStoreError>;

    /// All orders containing an item from the given shop, newest first (row id descending).
    async fn orders_for_shop(&self, shop_id: &ShopId) -> Result<Vec<OrderRecord>, OrderStoreError>;

    /// Persist a status transition and return the updated order.
    async fn set_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, OrderStoreError>;
}
