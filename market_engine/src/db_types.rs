use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use market_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

macro_rules! id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
        #[sqlx(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// A fresh opaque id: 128 random bits as 32 lowercase hex characters.
            pub fn random() -> Self {
                Self(format!("{:032x}", rand::random::<u128>()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(UserId, "Identity of a marketplace user, as issued by the external identity provider.");
id_type!(ProductId, "Identity of a catalog product.");
id_type!(ShopId, "Identity of a shop in the catalog.");
id_type!(OrderId, "Opaque unique token identifying an order.");
id_type!(MessageId, "Identity of a single chat message.");

//--------------------------------------    OrderStatus      ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum OrderStatus {
    /// The order has been created; payment has not been received.
    Created,
    /// The buyer has paid for the order. Chat write access opens here.
    Paid,
    /// The seller has shipped the order.
    Shipped,
    /// The order has been delivered and closed out.
    Completed,
    /// Terminal state: the order was cancelled.
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "Created"),
            OrderStatus::Paid => write!(f, "Paid"),
            OrderStatus::Shipped => write!(f, "Shipped"),
            OrderStatus::Completed => write!(f, "Completed"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Paid" => Ok(Self::Paid),
            "Shipped" => Ok(Self::Shipped),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Created");
            OrderStatus::Created
        })
    }
}

//--------------------------------------   ModerationStatus  ---------------------------------------------------------

/// External approval flag on a product or shop. Only `Approved` entities may be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn is_approved(&self) -> bool {
        matches!(self, ModerationStatus::Approved)
    }
}

impl Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "Pending"),
            ModerationStatus::Approved => write!(f, "Approved"),
            ModerationStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for ModerationStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------        Role         ---------------------------------------------------------

/// Derived per-request from comparing the requester's id to the order's buyer id and the item's
/// shop owner id. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Buyer => write!(f, "buyer"),
            Role::Seller => write!(f, "seller"),
        }
    }
}

//--------------------------------------       Order         ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    /// Internal row id. Monotonic, so it doubles as a stable recency proxy for "newest first".
    pub id: i64,
    pub order_id: OrderId,
    pub buyer_id: UserId,
    pub status: OrderStatus,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------     OrderItem       ---------------------------------------------------------

/// The single line entry of an order. Product and shop fields are snapshotted at order-creation
/// time and are immutable thereafter, even if the catalog later changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub shop_id: ShopId,
    pub product_name: String,
    pub product_image: String,
    pub product_price: Money,
    pub shop_name: String,
    /// Always 1 in the current design. Persisted, read by no business rule.
    pub quantity: i64,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------

/// A validated order ready for the atomic order + item insert. Carries exactly one product
/// snapshot: the marketplace sells one product per order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub buyer_id: UserId,
    pub product: ProductSnapshot,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(buyer_id: UserId, product: ProductSnapshot) -> Self {
        Self { order_id: OrderId::random(), buyer_id, product, created_at: Utc::now() }
    }
}

//--------------------------------------  Catalog snapshots  ---------------------------------------------------------

/// What the catalog snapshot reader answers for "get shop". The engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShopSnapshot {
    pub id: ShopId,
    pub name: String,
    pub owner_id: UserId,
    pub moderation: ModerationStatus,
}

/// What the catalog snapshot reader answers for "get product by id", including the owning shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub moderation: ModerationStatus,
    pub shop: ShopSnapshot,
}

impl ProductSnapshot {
    /// Both the product and its owning shop must be approved for the product to be orderable.
    pub fn is_moderated(&self) -> bool {
        self.moderation.is_approved() && self.shop.moderation.is_approved()
    }
}

//--------------------------------------    ChatMessage      ---------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub order_id: OrderId,
    pub sender_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A message about to be appended. The text is trimmed at construction.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: MessageId,
    pub order_id: OrderId,
    pub sender_id: UserId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    pub fn new(order_id: OrderId, sender_id: UserId, text: &str) -> Self {
        Self {
            id: MessageId::random(),
            order_id,
            sender_id,
            text: text.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}
