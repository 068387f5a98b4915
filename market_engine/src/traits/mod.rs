//! Storage contracts for the marketplace engine.
//!
//! Backends implement these traits to serve the marketplace server:
//!
//! * [`CatalogReader`] is the contract required of the external product/shop service. The engine
//!   only reads catalog data, and only at order-creation time to take snapshots.
//! * [`OrderStore`] owns the durable orders table and its single order-item rows. It is the only
//!   path that mutates order state.
//! * [`MessageStore`] is the append-only, order-scoped message log.
//! * [`MarketDatabase`] composes the three for concrete backends such as
//!   [`crate::SqliteDatabase`].
//!
//! The APIs bound on the narrower [`OrderBackend`] / [`ChatBackend`] combinations so that tests
//! can mock exactly the surface a handler touches.

mod catalog;
mod message_store;
mod order_store;

pub use catalog::{CatalogError, CatalogReader};
pub use message_store::{MessageStore, MessageStoreError};
pub use order_store::{OrderStore, OrderStoreError};

/// Everything the order service needs: catalog reads for validation and snapshots, plus the order
/// store itself.
pub trait OrderBackend: CatalogReader + OrderStore {}
impl<T: CatalogReader + OrderStore> OrderBackend for T {}

/// Everything the chat side needs: order loads for access checks, plus the message log.
pub trait ChatBackend: OrderStore + MessageStore {}
impl<T: OrderStore + MessageStore> ChatBackend for T {}

/// The full backend contract implemented by concrete databases.
pub trait MarketDatabase: OrderBackend + ChatBackend + Clone {
    /// The URL of the database.
    fn url(&self) -> &str;
}
