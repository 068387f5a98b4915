use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use market_engine::{
    db_types::{ChatMessage, OrderStatus},
    ChatApi,
};

use super::{
    helpers::{get_request, valid_token},
    mocks::MockMarketDb,
    orders::sample_record,
};
use crate::routes::ChatHistoryRoute;

#[actix_web::test]
async fn fetch_history_as_buyer() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("bob");
    let (status, body) = get_request(&token, "/orders/ord-1001/messages", configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, MESSAGES_JSON);
}

#[actix_web::test]
async fn fetch_history_as_a_stranger_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = valid_token("mallory");
    let (status, body) = get_request(&token, "/orders/ord-1001/messages", configure).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("No chat access"), "unexpected body: {body}");
}

#[actix_web::test]
async fn fetch_history_without_a_token() {
    let _ = env_logger::try_init().ok();
    let (status, _body) = get_request("", "/orders/ord-1001/messages", configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn configure(cfg: &mut ServiceConfig) {
    let mut db = MockMarketDb::new();
    db.expect_fetch_order().returning(|_| Ok(Some(sample_record("ord-1001", OrderStatus::Paid))));
    db.expect_messages_for_order().returning(|_| Ok(messages()));
    let api = ChatApi::new(db);
    cfg.service(ChatHistoryRoute::<MockMarketDb>::new()).app_data(web::Data::new(api));
}

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            id: "m-1".into(),
            order_id: "ord-1001".into(),
            sender_id: "bob".into(),
            text: "Paid! When does it ship?".into(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 5, 0).unwrap(),
        },
        ChatMessage {
            id: "m-2".into(),
            order_id: "ord-1001".into(),
            sender_id: "alice".into(),
            text: "Tomorrow morning.".into(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 6, 0).unwrap(),
        },
    ]
}

const MESSAGES_JSON: &str = r#"[{"id":"m-1","orderId":"ord-1001","senderId":"bob","text":"Paid! When does it ship?","createdAt":"2026-08-01T12:05:00Z"},{"id":"m-2","orderId":"ord-1001","senderId":"alice","text":"Tomorrow morning.","createdAt":"2026-08-01T12:06:00Z"}]"#;
