use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderItem, OrderStatus, ShopId, UserId},
    order_objects::OrderRecord,
    traits::OrderStoreError,
};

/// Inserts a new order row using the given connection. This is not atomic on its own; embed the
/// call inside a transaction and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: &NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (order_id, buyer_id, status, total_price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *;
        "#,
    )
    .bind(&order.order_id)
    .bind(&order.buyer_id)
    .bind(OrderStatus::Created.to_string())
    .bind(order.product.price)
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order [{}] inserted with id {}", order.order_id, order.id);
    Ok(order)
}

/// Inserts the order's single snapshot item. Same transaction contract as [`insert_order`].
pub async fn insert_order_item(order: &NewOrder, conn: &mut SqliteConnection) -> Result<OrderItem, OrderStoreError> {
    let product = &order.product;
    let item = sqlx::query_as(
        r#"
            INSERT INTO order_items (
                order_id,
                product_id,
                shop_id,
                product_name,
                product_image,
                product_price,
                shop_name,
                quantity
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
            RETURNING *;
        "#,
    )
    .bind(&order.order_id)
    .bind(&product.id)
    .bind(&product.shop.id)
    .bind(&product.name)
    .bind(&product.image)
    .bind(product.price)
    .bind(&product.shop.name)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_order(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

/// Loads the order together with its item and the item's shop owner id.
///
/// An order with no item, or whose shop has disappeared from the catalog, resolves to `None`: it
/// cannot be rendered or access-checked and is treated as nonexistent.
pub async fn fetch_order_record(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRecord>, OrderStoreError> {
    let Some(order) = fetch_order(order_id, &mut *conn).await? else {
        return Ok(None);
    };
    hydrate_record(order, conn).await
}

/// Attaches the item and shop owner to an already-loaded order row.
async fn hydrate_record(order: Order, conn: &mut SqliteConnection) -> Result<Option<OrderRecord>, OrderStoreError> {
    let order_id = &order.order_id;
    let item: Option<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 LIMIT 1")
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(item) = item else {
        trace!("🗃️ Order [{order_id}] has no item row");
        return Ok(None);
    };
    let owner: Option<UserId> = sqlx::query_scalar("SELECT user_id FROM shops WHERE id = $1")
        .bind(&item.shop_id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(shop_owner_id) = owner else {
        trace!("🗃️ Shop [{}] for order [{order_id}] is gone", item.shop_id);
        return Ok(None);
    };
    Ok(Some(OrderRecord { order, item, shop_owner_id }))
}

pub async fn orders_for_buyer(
    buyer_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderRecord>, OrderStoreError> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1").bind(buyer_id).fetch_all(&mut *conn).await?;
    collect_records(orders, conn).await
}

/// Orders containing at least one item from the given shop, newest first. The monotonic row id is
/// the recency proxy.
pub async fn orders_for_shop(
    shop_id: &ShopId,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderRecord>, OrderStoreError> {
    let orders: Vec<Order> = sqlx::query_as(
        r#"
            SELECT o.* FROM orders o
            JOIN order_items i ON i.order_id = o.order_id
            WHERE i.shop_id = $1
            ORDER BY o.id DESC
        "#,
    )
    .bind(shop_id)
    .fetch_all(&mut *conn)
    .await?;
    collect_records(orders, conn).await
}

async fn collect_records(
    orders: Vec<Order>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderRecord>, OrderStoreError> {
    let mut records = Vec::with_capacity(orders.len());
    for order in orders {
        if let Some(record) = hydrate_record(order, conn).await? {
            records.push(record);
        }
    }
    Ok(records)
}

pub async fn update_order_status(
    order_id: &OrderId,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderStoreError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 RETURNING *",
    )
    .bind(status.to_string())
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    result.ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))
}
