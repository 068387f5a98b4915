//! Marketplace Order & Chat Engine
//!
//! This library contains the core logic for the marketplace backend: the order lifecycle, the
//! access rule that couples orders to their private chat channel, and the append-only message log.
//! It is server-agnostic; the HTTP/WebSocket surface lives in `market_server`.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@sqlite`]). Callers should never need to access the
//!    database directly; use the public APIs instead. The exception is the data types used in the
//!    database, which are defined in the [`db_types`] module and are public.
//! 2. The storage contracts ([`mod@traits`]). Specific backends need to implement these traits in
//!    order to act as a backend for the marketplace server. The catalog traits double as the
//!    interface to the external product/shop service: the engine only ever reads catalog data.
//! 3. The public APIs ([`OrderApi`], [`ChatApi`]) and the access evaluator ([`mod@access`]), which
//!    is re-run on every access-sensitive operation rather than cached, so that a status change
//!    (such as a payment landing) takes effect on the very next check.

pub mod access;
mod api;
pub mod db_types;
pub mod order_objects;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{ChatApi, ChatApiError, OrderApi, OrderApiError};
