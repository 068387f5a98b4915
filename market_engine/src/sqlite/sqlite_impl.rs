//! `SqliteDatabase` is a concrete implementation of a marketplace engine backend.
//!
//! Unsurprisingly, it uses SQLite and implements all the traits defined in the [`crate::traits`]
//! module, including [`CatalogReader`]: in this deployment the catalog tables live in the same
//! database file, so the "external" catalog reads are plain queries against read-only tables.
use std::fmt::Debug;

use log::debug;
use sqlx::SqlitePool;

use super::db::{catalog, db_url, messages, new_pool, orders};
use crate::{
    db_types::{
        ChatMessage,
        NewMessage,
        NewOrder,
        Order,
        OrderId,
        OrderStatus,
        ProductId,
        ProductSnapshot,
        ShopId,
        ShopSnapshot,
        UserId,
    },
    order_objects::OrderRecord,
    traits::{CatalogError, CatalogReader, MarketDatabase, MessageStore, MessageStoreError, OrderStore, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        debug!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl MarketDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }
}

impl CatalogReader for SqliteDatabase {
    async fn user_exists(&self, user_id: &UserId) -> Result<bool, CatalogError> {
        let mut conn = self.pool.acquire().await.map_err(|e| CatalogError::DatabaseError(e.to_string()))?;
        let exists = catalog::user_exists(user_id, &mut conn).await?;
        Ok(exists)
    }

    async fn product_by_id(&self, product_id: &ProductId) -> Result<Option<ProductSnapshot>, CatalogError> {
        let mut conn = self.pool.acquire().await.map_err(|e| CatalogError::DatabaseError(e.to_string()))?;
        let product = catalog::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn shop_for_user(&self, user_id: &UserId) -> Result<Option<ShopSnapshot>, CatalogError> {
        let mut conn = self.pool.acquire().await.map_err(|e| CatalogError::DatabaseError(e.to_string()))?;
        let shop = catalog::fetch_shop_for_user(user_id, &mut conn).await?;
        Ok(shop)
    }
}

impl OrderStore for SqliteDatabase {
    /// Takes a validated order and, in a single atomic transaction, inserts the order row and its
    /// snapshot item. Any failure rolls the whole transaction back: no partial order is ever
    /// visible afterwards.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let stored = orders::insert_order(&order, &mut tx).await?;
        let item = orders::insert_order_item(&order, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] and its item saved for buyer [{}]", stored.order_id, stored.buyer_id);
        let shop_owner_id = order.product.shop.owner_id;
        Ok(OrderRecord { order: stored, item, shop_owner_id })
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_record(order_id, &mut conn).await
    }

    async fn orders_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::orders_for_buyer(buyer_id, &mut conn).await
    }

    async fn orders_for_shop(&self, shop_id: &ShopId) -> Result<Vec<OrderRecord>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::orders_for_shop(shop_id, &mut conn).await
    }

    async fn set_order_status(&self, order_id: &OrderId, status: OrderStatus) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(order_id, status, &mut conn).await?;
        debug!("🗃️ Order [{order_id}] is now {status}");
        Ok(order)
    }
}

impl MessageStore for SqliteDatabase {
    async fn append_message(&self, message: NewMessage) -> Result<ChatMessage, MessageStoreError> {
        if message.order_id.is_empty() {
            return Err(MessageStoreError::EmptyOrderId);
        }
        if message.text.trim().is_empty() {
            return Err(MessageStoreError::EmptyText);
        }
        let mut conn = self.pool.acquire().await?;
        messages::insert_message(&message, &mut conn).await
    }

    async fn messages_for_order(&self, order_id: &OrderId) -> Result<Vec<ChatMessage>, MessageStoreError> {
        if order_id.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.acquire().await?;
        messages::messages_for_order(order_id, &mut conn).await
    }
}
