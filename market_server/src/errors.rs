use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use market_engine::{ChatApiError, OrderApiError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    OrderError(OrderApiError),
    #[error("{0}")]
    ChatError(ChatApiError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
            },
            Self::OrderError(e) => match e {
                OrderApiError::InvalidUserId => StatusCode::BAD_REQUEST,
                OrderApiError::InvalidProductId => StatusCode::BAD_REQUEST,
                OrderApiError::CantBuySelf => StatusCode::BAD_REQUEST,
                OrderApiError::UnmoderatedData => StatusCode::BAD_REQUEST,
                OrderApiError::InvalidStatusChange => StatusCode::BAD_REQUEST,
                OrderApiError::NotEnoughRights => StatusCode::FORBIDDEN,
                OrderApiError::InvalidOrderId => StatusCode::NOT_FOUND,
                OrderApiError::ShopNotFound => StatusCode::NOT_FOUND,
                OrderApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::ChatError(e) => match e {
                ChatApiError::EmptyMessage => StatusCode::BAD_REQUEST,
                ChatApiError::AccessDenied => StatusCode::FORBIDDEN,
                ChatApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        Self::OrderError(e)
    }
}

impl From<ChatApiError> for ServerError {
    fn from(e: ChatApiError) -> Self {
        Self::ChatError(e)
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
}
