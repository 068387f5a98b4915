use sqlx::SqliteConnection;

use crate::db_types::{ModerationStatus, ProductId, ProductSnapshot, ShopId, ShopSnapshot, UserId};

pub async fn user_exists(user_id: &UserId, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = $1").bind(user_id).fetch_one(conn).await?;
    Ok(count > 0)
}

pub async fn fetch_shop(shop_id: &ShopId, conn: &mut SqliteConnection) -> Result<Option<ShopSnapshot>, sqlx::Error> {
    let shop = sqlx::query_as("SELECT id, name, user_id AS owner_id, moderation FROM shops WHERE id = $1")
        .bind(shop_id)
        .fetch_optional(conn)
        .await?;
    Ok(shop)
}

pub async fn fetch_shop_for_user(
    user_id: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<ShopSnapshot>, sqlx::Error> {
    let shop = sqlx::query_as("SELECT id, name, user_id AS owner_id, moderation FROM shops WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await?;
    Ok(shop)
}

/// Resolves a product with its owning shop in one go. Returns `None` if either is missing.
pub async fn fetch_product(
    product_id: &ProductId,
    conn: &mut SqliteConnection,
) -> Result<Option<ProductSnapshot>, sqlx::Error> {
    let row: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(product) = row else {
        return Ok(None);
    };
    let Some(shop) = fetch_shop(&product.shop_id, conn).await? else {
        return Ok(None);
    };
    Ok(Some(ProductSnapshot {
        id: product.id,
        name: product.name,
        price: product.price.into(),
        image: product.image,
        moderation: product.moderation,
        shop,
    }))
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    shop_id: ShopId,
    name: String,
    image: String,
    price: i64,
    moderation: ModerationStatus,
}
