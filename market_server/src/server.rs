use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use market_engine::{sqlite::run_migrations, ChatApi, OrderApi, SqliteDatabase};

use crate::{
    chat::{chat_ws, ChatRegistry},
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        ChatHistoryRoute,
        CreateOrderRoute,
        MyOrdersRoute,
        OrderByIdRoute,
        PayOrderRoute,
        ShopOrdersRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    run_migrations(db.pool()).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Database ready at {}", config.database_url);
    let registry = ChatRegistry::new();
    let srv = create_server_instance(config, db, registry)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    registry: ChatRegistry,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let orders_api = OrderApi::new(db.clone());
        let chat_api = ChatApi::new(db.clone());
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("mkt::access_log"))
            .app_data(web::Data::new(orders_api))
            .app_data(web::Data::new(chat_api))
            .app_data(web::Data::new(registry.clone()))
            .app_data(web::Data::new(config.auth.clone()));
        let api_scope = web::scope("/api")
            .service(CreateOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(OrderByIdRoute::<SqliteDatabase>::new())
            .service(ShopOrdersRoute::<SqliteDatabase>::new())
            .service(PayOrderRoute::<SqliteDatabase>::new())
            .service(ChatHistoryRoute::<SqliteDatabase>::new());
        app.service(health)
            .service(api_scope)
            .service(web::resource("/ws/chat").route(web::get().to(chat_ws::<SqliteDatabase>)))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
