//! Shared scaffolding for the integration tests: a throwaway SQLite file per test, plus seed
//! helpers for the catalog tables the engine only ever reads.

use log::*;
use market_common::Money;
use market_engine::{
    db_types::{ModerationStatus, ProductId, ShopId, UserId},
    sqlite::run_migrations,
    SqliteDatabase,
};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

pub fn random_db_path() -> String {
    format!("sqlite://../data/test_store_{}.db", rand::random::<u64>())
}

pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    run_migrations(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
    db
}

pub async fn create_database(url: &str) {
    let _ = std::fs::create_dir_all("../data");
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

pub async fn seed_user(pool: &SqlitePool, id: &str, username: &str) -> UserId {
    sqlx::query("INSERT INTO users (id, username) VALUES ($1, $2)")
        .bind(id)
        .bind(username)
        .execute(pool)
        .await
        .expect("Error seeding user");
    UserId::from(id)
}

pub async fn seed_shop(pool: &SqlitePool, id: &str, owner: &UserId, name: &str, moderation: ModerationStatus) -> ShopId {
    sqlx::query("INSERT INTO shops (id, user_id, name, moderation) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(owner.as_str())
        .bind(name)
        .bind(moderation.to_string())
        .execute(pool)
        .await
        .expect("Error seeding shop");
    ShopId::from(id)
}

pub async fn seed_product(
    pool: &SqlitePool,
    id: &str,
    shop: &ShopId,
    name: &str,
    price: Money,
    moderation: ModerationStatus,
) -> ProductId {
    sqlx::query("INSERT INTO products (id, shop_id, name, image, price, moderation) VALUES ($1, $2, $3, $4, $5, $6)")
        .bind(id)
        .bind(shop.as_str())
        .bind(name)
        .bind(format!("{id}.png"))
        .bind(price)
        .bind(moderation.to_string())
        .execute(pool)
        .await
        .expect("Error seeding product");
    ProductId::from(id)
}

/// Seeds the standard cast: a seller with an approved shop and product, plus a buyer.
pub struct Marketplace {
    pub db: SqliteDatabase,
    pub buyer: UserId,
    pub seller: UserId,
    pub shop: ShopId,
    pub product: ProductId,
}

pub async fn standard_marketplace(url: &str) -> Marketplace {
    let db = prepare_test_env(url).await;
    let pool = db.pool().clone();
    let seller = seed_user(&pool, "alice", "Alice").await;
    let buyer = seed_user(&pool, "bob", "Bob").await;
    let shop = seed_shop(&pool, "shop-alice", &seller, "Alice's Attic", ModerationStatus::Approved).await;
    let product =
        seed_product(&pool, "prod-lamp", &shop, "Brass lamp", Money::from(4_500), ModerationStatus::Approved).await;
    Marketplace { db, buyer, seller, shop, product }
}
