use market_engine::db_types::OrderId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderParams {
    pub product_id: String,
}

/// Query parameters for the WebSocket handshake. Browser clients cannot set headers on a
/// WebSocket upgrade, so the token may travel as a query parameter; non-browser clients can use
/// the regular `Authorization` header instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatQuery {
    pub order_id: OrderId,
    pub token: Option<String>,
}
