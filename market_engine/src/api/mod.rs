mod chat_api;
mod errors;
mod order_api;

pub use chat_api::ChatApi;
pub use errors::{ChatApiError, OrderApiError};
pub use order_api::OrderApi;
