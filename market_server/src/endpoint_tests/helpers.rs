use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};

use crate::{auth::TokenIssuer, config::AuthConfig};

// A fixed test secret for issuing tokens. DO NOT re-use this key anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: "endpoint-test-secret-0123456789abcdef".into() }
}

pub fn valid_token(user_id: &str) -> String {
    TokenIssuer::new(&get_auth_config()).issue_token(user_id.into(), None).expect("Failed to sign token")
}

pub async fn get_request(token: &str, path: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let req = TestRequest::get().uri(path);
    send_request(req, token, configure).await
}

pub async fn post_request(
    token: &str,
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> (StatusCode, String) {
    let req = TestRequest::post().uri(path).set_json(body);
    send_request(req, token, configure).await
}

async fn send_request(mut req: TestRequest, token: &str, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    if !token.is_empty() {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    let req = req.to_request();
    let app = App::new().app_data(web::Data::new(get_auth_config())).configure(configure);
    let service = test::init_service(app).await;
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
