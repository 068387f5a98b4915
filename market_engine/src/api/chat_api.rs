use std::fmt::Debug;

use log::debug;

use crate::{
    access,
    db_types::{ChatMessage, NewMessage, OrderId, UserId},
    order_objects::AccessDecision,
    traits::ChatBackend,
    ChatApiError,
};

/// `ChatApi` is the single append path into an order's conversation.
///
/// Every append re-runs the access evaluator for the sender at append time, so the invariant "a
/// message exists only if its sender held write access when it was appended" holds no matter who
/// calls — the gateway, a future bot, or a test.
pub struct ChatApi<B> {
    db: B,
}

impl<B> Debug for ChatApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChatApi")
    }
}

impl<B> ChatApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ChatApi<B>
where B: ChatBackend
{
    /// Validate and append one message.
    ///
    /// Blank text is rejected before any lookup. Access is evaluated fresh — a payment that
    /// landed a millisecond ago already opens the gate; a cancellation already closes it.
    pub async fn post_message(
        &self,
        order_id: &OrderId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<ChatMessage, ChatApiError> {
        if text.trim().is_empty() {
            return Err(ChatApiError::EmptyMessage);
        }
        let decision = access::check_order_access(&self.db, order_id, sender_id).await?;
        if !decision.has_access || !decision.can_write {
            debug!("💬️ Rejecting message from [{sender_id}] on order [{order_id}]: no write access");
            return Err(ChatApiError::AccessDenied);
        }
        let message = self.db.append_message(NewMessage::new(order_id.clone(), sender_id.clone(), text)).await?;
        Ok(message)
    }

    /// Evaluate the caller's current standing on an order's conversation without touching it.
    /// The gateway calls this at connect time; a missing order is a plain denial.
    pub async fn check_access(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
    ) -> Result<AccessDecision, ChatApiError> {
        let decision = access::check_order_access(&self.db, order_id, user_id).await?;
        Ok(decision)
    }

    /// Full conversation history, ascending by `created_at`. The requester needs read access;
    /// write access is not required to look.
    pub async fn history(&self, order_id: &OrderId, requester: &UserId) -> Result<Vec<ChatMessage>, ChatApiError> {
        let decision = access::check_order_access(&self.db, order_id, requester).await?;
        if !decision.has_access {
            return Err(ChatApiError::AccessDenied);
        }
        let messages = self.db.messages_for_order(order_id).await?;
        Ok(messages)
    }
}
