//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use market_engine::{
    db_types::{OrderId, ProductId},
    traits::{ChatBackend, OrderBackend},
    ChatApi,
    OrderApi,
};

use crate::{auth::JwtClaims, data_objects::CreateOrderParams, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(create_order => Post "/orders" impl OrderBackend);
/// Route handler for creating a new order.
///
/// The authenticated caller becomes the buyer. The product id is the only input; price, name and
/// shop details are snapshotted from the catalog at creation time.
pub async fn create_order<B: OrderBackend>(
    claims: JwtClaims,
    body: web::Json<CreateOrderParams>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let params = body.into_inner();
    debug!("💻️ POST order for product [{}] by [{}]", params.product_id, claims.sub);
    let order = api.create_order(&claims.sub, &ProductId::from(params.product_id)).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(order_by_id => Get "/orders/{order_id}" impl OrderBackend);
/// Fetch a single order. Only the order's buyer and the owner of the shop it was placed against
/// may see it; the response carries the caller's role so clients can render the right view.
pub async fn order_by_id<B: OrderBackend>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET order [{order_id}] for [{}]", claims.sub);
    let order = api.order_by_id(&order_id, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(order))
}

route!(my_orders => Get "/orders" impl OrderBackend);
/// All orders placed by the authenticated caller.
pub async fn my_orders<B: OrderBackend>(
    claims: JwtClaims,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET my_orders for [{}]", claims.sub);
    let orders = api.orders_for_buyer(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(shop_orders => Get "/shop/orders" impl OrderBackend);
/// All orders placed against the authenticated caller's shop, newest first.
pub async fn shop_orders<B: OrderBackend>(
    claims: JwtClaims,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET shop_orders for [{}]", claims.sub);
    let orders = api.orders_for_shop(&claims.sub).await?;
    Ok(HttpResponse::Ok().json(orders))
}

route!(pay_order => Post "/orders/{order_id}/pay" impl OrderBackend);
/// The buy action. Only the order's buyer may pay, and only while the order is still `Created`.
pub async fn pay_order<B: OrderBackend>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    api: web::Data<OrderApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ POST pay for order [{order_id}] by [{}]", claims.sub);
    api.mark_paid(&claims.sub, &order_id).await?;
    Ok(HttpResponse::Ok().json(true))
}

//----------------------------------------------   Chat  ----------------------------------------------------

route!(chat_history => Get "/orders/{order_id}/messages" impl ChatBackend);
/// The full message history for an order's conversation. Requires read access to the order.
pub async fn chat_history<B: ChatBackend>(
    claims: JwtClaims,
    path: web::Path<OrderId>,
    api: web::Data<ChatApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    debug!("💻️ GET chat history for order [{order_id}] by [{}]", claims.sub);
    let messages = api.history(&order_id, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(messages))
}
