use market_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{Order, OrderId, OrderItem, OrderStatus, ProductId, Role, ShopId, UserId};

/// An order loaded together with its single item and the item's shop owner id.
///
/// This is the unit the access evaluator reasons about: everything needed to answer
/// "may this user see or write to this order's conversation" in one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order: Order,
    pub item: OrderItem,
    pub shop_owner_id: UserId,
}

/// The buyer/seller-facing view of an order: the wire contract for every order-returning endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub shop_id: ShopId,
    pub shop_name: String,
    pub price: Money,
    /// Resolved for single-order fetches so the caller can render role-specific UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl OrderView {
    pub fn from_record(record: &OrderRecord, role: Option<Role>) -> Self {
        Self {
            order_id: record.order.order_id.clone(),
            status: record.order.status,
            product_id: record.item.product_id.clone(),
            product_name: record.item.product_name.clone(),
            product_image: record.item.product_image.clone(),
            shop_id: record.item.shop_id.clone(),
            shop_name: record.item.shop_name.clone(),
            price: record.order.total_price,
            role,
        }
    }
}

/// The result of an access check. Ephemeral: recomputed on every authorization-sensitive call and
/// never cached beyond a single check's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub has_access: bool,
    pub can_write: bool,
    pub role: Option<Role>,
    /// A snapshot view of the order, so callers can render without a second lookup.
    pub order: Option<OrderView>,
}

impl AccessDecision {
    pub fn denied() -> Self {
        Self { has_access: false, can_write: false, role: None, order: None }
    }
}
