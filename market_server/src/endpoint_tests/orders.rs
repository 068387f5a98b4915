use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use log::debug;
use market_common::Money;
use market_engine::{
    db_types::{ModerationStatus, Order, OrderId, OrderItem, OrderStatus, ProductSnapshot, ShopSnapshot},
    order_objects::OrderRecord,
    OrderApi,
};
use serde_json::json;

use super::{
    helpers::{get_request, post_request, valid_token},
    mocks::MockMarketDb,
};
use crate::routes::{CreateOrderRoute, MyOrdersRoute, OrderByIdRoute, PayOrderRoute};

#[actix_web::test]
async fn fetch_my_orders_without_a_token() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("", "/orders", configure_listing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("No access token was provided"), "unexpected body: {body}");
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, body) = get_request(&token, "/orders", configure_listing).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ORDERS_JSON);
}

#[actix_web::test]
async fn fetch_my_orders_with_a_tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut token = valid_token("bob");
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    debug!("Calling /orders with tampered token {token}");
    let (status, _body) = get_request(&token, "/orders", configure_listing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_an_order() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, body) = post_request(&token, "/orders", json!({"productId": "prod-lamp"}), configure_create).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, NEW_ORDER_JSON);
}

#[actix_web::test]
async fn creating_an_order_for_your_own_product_is_rejected() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("alice");
    let (status, body) = post_request(&token, "/orders", json!({"productId": "prod-lamp"}), configure_create).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("their own listings"), "unexpected body: {body}");
}

#[actix_web::test]
async fn fetch_order_as_buyer_resolves_the_role() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, body) = get_request(&token, "/orders/ord-1001", configure_single).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ORDER_AS_BUYER_JSON);
}

#[actix_web::test]
async fn fetch_order_as_a_stranger_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("mallory");
    let (status, _body) = get_request(&token, "/orders/ord-1001", configure_single).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn fetch_missing_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, _body) = get_request(&token, "/orders/ord-9999", configure_single).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn the_buyer_can_pay_a_created_order() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, body) = post_request(&token, "/orders/ord-1001/pay", json!({}), configure_pay).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "true");
}

#[actix_web::test]
async fn the_seller_cannot_pay() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("alice");
    let (status, _body) = post_request(&token, "/orders/ord-1001/pay", json!({}), configure_pay).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn paying_twice_is_an_invalid_transition() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, _body) = post_request(&token, "/orders/ord-1001/pay", json!({}), configure_pay_already_paid).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

pub fn sample_record(order_id: &str, status: OrderStatus) -> OrderRecord {
    let created = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
    OrderRecord {
        order: Order {
            id: 1,
            order_id: OrderId::from(order_id),
            buyer_id: "bob".into(),
            status,
            total_price: Money::from(4_500),
            created_at: created,
            updated_at: created,
        },
        item: OrderItem {
            id: 1,
            order_id: OrderId::from(order_id),
            product_id: "prod-lamp".into(),
            shop_id: "shop-alice".into(),
            product_name: "Brass lamp".into(),
            product_image: "prod-lamp.png".into(),
            product_price: Money::from(4_500),
            shop_name: "Alice's Attic".into(),
            quantity: 1,
        },
        shop_owner_id: "alice".into(),
    }
}

fn sample_product() -> ProductSnapshot {
    ProductSnapshot {
        id: "prod-lamp".into(),
        name: "Brass lamp".into(),
        price: Money::from(4_500),
        image: "prod-lamp.png".into(),
        moderation: ModerationStatus::Approved,
        shop: ShopSnapshot {
            id: "shop-alice".into(),
            name: "Alice's Attic".into(),
            owner_id: "alice".into(),
            moderation: ModerationStatus::Approved,
        },
    }
}

fn configure_listing(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_orders_for_buyer()
        .returning(|_| Ok(vec![sample_record("ord-1001", OrderStatus::Paid), sample_record("ord-1002", OrderStatus::Created)]));
    let api = OrderApi::new(db);
    cfg.service(MyOrdersRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_create(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_user_exists().returning(|_| Ok(true));
    db.expect_product_by_id().returning(|_| Ok(Some(sample_product())));
    db.expect_create_order().returning(|_| Ok(sample_record("ord-1001", OrderStatus::Created)));
    let api = OrderApi::new(db);
    cfg.service(CreateOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_single(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|id| {
        if id.as_str() == "ord-1001" {
            Ok(Some(sample_record("ord-1001", OrderStatus::Paid)))
        } else {
            Ok(None)
        }
    });
    let api = OrderApi::new(db);
    cfg.service(OrderByIdRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_pay(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(Some(sample_record("ord-1001", OrderStatus::Created))));
    db.expect_set_order_status()
        .returning(|_, status| Ok(sample_record("ord-1001", status).order));
    let api = OrderApi::new(db);
    cfg.service(PayOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn configure_pay_already_paid(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(Some(sample_record("ord-1001", OrderStatus::Paid))));
    let api = OrderApi::new(db);
    cfg.service(PayOrderRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

const ORDERS_JSON: &str = r#"[{"orderId":"ord-1001","status":"Paid","productId":"prod-lamp","productName":"Brass lamp","productImage":"prod-lamp.png","shopId":"shop-alice","shopName":"Alice's Attic","price":4500},{"orderId":"ord-1002","status":"Created","productId":"prod-lamp","productName":"Brass lamp","productImage":"prod-lamp.png","shopId":"shop-alice","shopName":"Alice's Attic","price":4500}]"#;

const NEW_ORDER_JSON: &str = r#"{"orderId":"ord-1001","status":"Created","productId":"prod-lamp","productName":"Brass lamp","productImage":"prod-lamp.png","shopId":"shop-alice","shopName":"Alice's Attic","price":4500}"#;

const ORDER_AS_BUYER_JSON: &str = r#"{"orderId":"ord-1001","status":"Paid","productId":"prod-lamp","productName":"Brass lamp","productImage":"prod-lamp.png","shopId":"shop-alice","shopName":"Alice's Attic","price":4500,"role":"buyer"}"#;
