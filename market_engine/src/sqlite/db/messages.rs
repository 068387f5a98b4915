use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{ChatMessage, NewMessage, OrderId},
    traits::MessageStoreError,
};

/// Appends one message row. Validation of the order id and text happens before this call.
pub async fn insert_message(
    message: &NewMessage,
    conn: &mut SqliteConnection,
) -> Result<ChatMessage, MessageStoreError> {
    let stored: ChatMessage = sqlx::query_as(
        r#"
            INSERT INTO order_messages (id, order_id, sender_id, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(&message.id)
    .bind(&message.order_id)
    .bind(&message.sender_id)
    .bind(&message.text)
    .bind(message.created_at)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Message [{}] appended to order [{}]", stored.id, stored.order_id);
    Ok(stored)
}

/// Full history for the order, ascending by `created_at`. Two messages racing at sub-resolution
/// can tie on the timestamp; the row id keeps the relative order stable.
pub async fn messages_for_order(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Vec<ChatMessage>, MessageStoreError> {
    let messages =
        sqlx::query_as("SELECT * FROM order_messages WHERE order_id = $1 ORDER BY created_at ASC, rowid ASC")
            .bind(order_id)
            .fetch_all(conn)
            .await?;
    Ok(messages)
}
