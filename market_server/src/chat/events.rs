use market_engine::db_types::{ChatMessage, Role};
use serde::{Deserialize, Serialize};

/// Server-to-client events on the chat socket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ChatEvent {
    /// Sent once, immediately after a successful handshake.
    #[serde(rename_all = "camelCase")]
    Permissions { can_write: bool, role: Option<Role> },
    /// The full conversation so far, sent once after `permissions`.
    #[serde(rename_all = "camelCase")]
    History { messages: Vec<ChatMessage> },
    /// A message accepted into the conversation, fanned out to every live member.
    Message(ChatMessage),
}

/// Client-to-server requests. Externally tagged, e.g. `{"send": {"text": "hello"}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientRequest {
    Send(SendRequest),
}

/// The socket is already scoped to one order, so `orderId` is optional on the wire; if a client
/// does include it, it must match the connection's order or the frame is dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub order_id: Option<market_engine::db_types::OrderId>,
    pub text: String,
}
