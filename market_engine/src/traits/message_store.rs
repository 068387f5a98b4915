use thiserror::Error;

use crate::db_types::{ChatMessage, NewMessage, OrderId};

#[derive(Debug, Clone, Error)]
pub enum MessageStoreError {
    #[error("Message order id may not be empty")]
    EmptyOrderId,
    #[error("Message text may not be empty")]
    EmptyText,
    #[error("Message database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for MessageStoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// Append-only log of chat messages, keyed by order id. Messages are never mutated or deleted.
#[allow(async_fn_in_trait)]
pub trait MessageStore {
    /// Append a message. Rejects an empty order id or blank text before touching storage.
    async fn append_message(&self, message: NewMessage) -> Result<ChatMessage, MessageStoreError>;

    /// Full history for an order, ascending by `created_at` (row id breaks sub-resolution ties).
    /// An empty order id yields an empty result rather than an error.
    async fn messages_for_order(&self, order_id: &OrderId) -> Result<Vec<ChatMessage>, MessageStoreError>;
}
