use thiserror::Error;

use crate::traits::{CatalogError, MessageStoreError, OrderStoreError};

/// Typed outcome codes for the order service. Business-rule rejections are expected,
/// recoverable-by-the-caller conditions; only `DatabaseError` represents a storage fault.
#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Unknown or invalid user id")]
    InvalidUserId,
    #[error("Unknown or invalid product id")]
    InvalidProductId,
    #[error("Sellers may not buy their own listings")]
    CantBuySelf,
    #[error("The product or its shop has not passed moderation")]
    UnmoderatedData,
    #[error("Unknown or invalid order id")]
    InvalidOrderId,
    #[error("Not enough rights to access this order")]
    NotEnoughRights,
    #[error("No shop is registered for this user")]
    ShopNotFound,
    #[error("The order is not in a state that allows this transition")]
    InvalidStatusChange,
    #[error("Order database error: {0}")]
    DatabaseError(String),
}

impl From<CatalogError> for OrderApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::DatabaseError(e) => Self::DatabaseError(e),
        }
    }
}

impl From<OrderStoreError> for OrderApiError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(_) => Self::InvalidOrderId,
            OrderStoreError::DatabaseError(e) => Self::DatabaseError(e),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ChatApiError {
    #[error("Message text may not be empty")]
    EmptyMessage,
    #[error("No chat access for this order")]
    AccessDenied,
    #[error("Chat database error: {0}")]
    DatabaseError(String),
}

impl From<MessageStoreError> for ChatApiError {
    fn from(e: MessageStoreError) -> Self {
        match e {
            MessageStoreError::EmptyText => Self::EmptyMessage,
            MessageStoreError::EmptyOrderId => Self::AccessDenied,
            MessageStoreError::DatabaseError(e) => Self::DatabaseError(e),
        }
    }
}

impl From<OrderStoreError> for ChatApiError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(_) => Self::AccessDenied,
            OrderStoreError::DatabaseError(e) => Self::DatabaseError(e),
        }
    }
}
