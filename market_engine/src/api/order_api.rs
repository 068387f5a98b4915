use std::fmt::Debug;

use log::{debug, info};

use crate::{
    access,
    db_types::{NewOrder, OrderId, OrderStatus, ProductId, UserId},
    order_objects::{AccessDecision, OrderView},
    traits::OrderBackend,
    OrderApiError,
};

/// `OrderApi` is the primary API for the order lifecycle: creation against a catalog snapshot,
/// the payment transition, and role-aware retrieval. It is the sole writer of order state.
pub struct OrderApi<B> {
    db: B,
}

impl<B> Debug for OrderApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderApi")
    }
}

impl<B> OrderApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> OrderApi<B>
where B: OrderBackend
{
    /// Create an order for `buyer_id` against the current catalog snapshot of `product_id`.
    ///
    /// Preconditions are validated in order, each with its own outcome code, and nothing is
    /// written until all of them pass:
    /// 1. The buyer must be a known user ([`OrderApiError::InvalidUserId`]).
    /// 2. The product must resolve via the catalog ([`OrderApiError::InvalidProductId`]).
    /// 3. The buyer may not own the product's shop ([`OrderApiError::CantBuySelf`]).
    /// 4. Both the product and its shop must be approved ([`OrderApiError::UnmoderatedData`]).
    ///
    /// The order and its snapshot item are then inserted in one atomic transaction.
    pub async fn create_order(&self, buyer_id: &UserId, product_id: &ProductId) -> Result<OrderView, OrderApiError> {
        if buyer_id.is_empty() || !self.db.user_exists(buyer_id).await? {
            return Err(OrderApiError::InvalidUserId);
        }
        if product_id.is_empty() {
            return Err(OrderApiError::InvalidProductId);
        }
        let product = self.db.product_by_id(product_id).await?.ok_or(OrderApiError::InvalidProductId)?;
        if product.shop.owner_id == *buyer_id {
            debug!("📦️ User [{buyer_id}] tried to buy their own product [{product_id}]");
            return Err(OrderApiError::CantBuySelf);
        }
        if !product.is_moderated() {
            debug!("📦️ Product [{product_id}] or its shop is not moderated. Rejecting order.");
            return Err(OrderApiError::UnmoderatedData);
        }
        let record = self.db.create_order(NewOrder::new(buyer_id.clone(), product)).await?;
        info!(
            "📦️ Order [{}] created for buyer [{buyer_id}]: {} at {}",
            record.order.order_id, record.item.product_name, record.order.total_price
        );
        Ok(OrderView::from_record(&record, None))
    }

    /// Fetch one order with the requester's role resolved, so the caller can render
    /// role-specific UI. Buyer is checked before seller; anyone else is rejected.
    pub async fn order_by_id(&self, order_id: &OrderId, requester: &UserId) -> Result<OrderView, OrderApiError> {
        if requester.is_empty() {
            return Err(OrderApiError::InvalidUserId);
        }
        if order_id.is_empty() {
            return Err(OrderApiError::InvalidOrderId);
        }
        let record = self.db.fetch_order(order_id).await?.ok_or(OrderApiError::InvalidOrderId)?;
        let decision = access::evaluate(&record, requester);
        if !decision.has_access {
            debug!("📦️ User [{requester}] may not view order [{order_id}]");
            return Err(OrderApiError::NotEnoughRights);
        }
        Ok(OrderView::from_record(&record, decision.role))
    }

    /// All orders placed by the given buyer, summarized from their snapshot items.
    pub async fn orders_for_buyer(&self, buyer_id: &UserId) -> Result<Vec<OrderView>, OrderApiError> {
        if buyer_id.is_empty() {
            return Err(OrderApiError::InvalidUserId);
        }
        let records = self.db.orders_for_buyer(buyer_id).await?;
        Ok(records.iter().map(|r| OrderView::from_record(r, None)).collect())
    }

    /// All orders for the shop owned by `user_id`, newest first, projected onto that shop's
    /// product line.
    pub async fn orders_for_shop(&self, user_id: &UserId) -> Result<Vec<OrderView>, OrderApiError> {
        if user_id.is_empty() {
            return Err(OrderApiError::InvalidUserId);
        }
        let shop = self.db.shop_for_user(user_id).await?.ok_or(OrderApiError::ShopNotFound)?;
        let records = self.db.orders_for_shop(&shop.id).await?;
        Ok(records.iter().map(|r| OrderView::from_record(r, None)).collect())
    }

    /// The "buy" action: transition the order to `Paid`.
    ///
    /// Only the order's buyer may pay, and only from `Created`. Payment is modeled as a trusted
    /// status transition; there is no gateway integration behind it.
    pub async fn mark_paid(&self, requester: &UserId, order_id: &OrderId) -> Result<(), OrderApiError> {
        if requester.is_empty() {
            return Err(OrderApiError::InvalidUserId);
        }
        if order_id.is_empty() {
            return Err(OrderApiError::InvalidOrderId);
        }
        let record = self.db.fetch_order(order_id).await?.ok_or(OrderApiError::InvalidOrderId)?;
        if record.order.buyer_id != *requester {
            debug!("📦️ User [{requester}] is not the buyer of order [{order_id}]");
            return Err(OrderApiError::NotEnoughRights);
        }
        if record.order.status != OrderStatus::Created {
            debug!("📦️ Order [{order_id}] is {}; it cannot be paid", record.order.status);
            return Err(OrderApiError::InvalidStatusChange);
        }
        self.db.set_order_status(order_id, OrderStatus::Paid).await?;
        info!("📦️ Order [{order_id}] paid by [{requester}]");
        Ok(())
    }

    /// The shared authorization rule: every read path and the chat gateway go through this.
    /// Recomputed on every call, never cached.
    pub async fn check_access(&self, order_id: &OrderId, user_id: &UserId) -> Result<AccessDecision, OrderApiError> {
        let decision = access::check_order_access(&self.db, order_id, user_id).await?;
        Ok(decision)
    }
}
