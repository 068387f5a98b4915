use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{CloseCode, CloseReason, Message, MessageStream, Session};
use futures::StreamExt;
use log::*;
use market_engine::{
    db_types::{OrderId, UserId},
    order_objects::AccessDecision,
    traits::ChatBackend,
    ChatApi,
    ChatApiError,
};

use super::{
    events::{ChatEvent, ClientRequest},
    registry::ChatRegistry,
};
use crate::{auth::decode_token, config::AuthConfig, data_objects::ChatQuery};

/// What became of one inbound send request. Rejections are deliberately invisible to the sender:
/// the socket stays open and no error frame is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered(usize),
    DroppedSilently,
}

/// The WebSocket entry point at `/ws/chat?orderId=...&token=...`.
///
/// The HTTP upgrade always succeeds; authorization happens on the socket itself so that clients
/// get a proper close frame instead of a failed handshake they cannot introspect.
pub async fn chat_ws<B: ChatBackend + 'static>(
    req: HttpRequest,
    payload: web::Payload,
    query: web::Query<ChatQuery>,
    api: web::Data<ChatApi<B>>,
    registry: web::Data<ChatRegistry>,
    auth: web::Data<AuthConfig>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, msg_stream) = actix_ws::handle(&req, payload)?;
    let query = query.into_inner();
    let token = query.token.clone().or_else(|| bearer_token(&req));
    let api = api.into_inner();
    let registry = registry.get_ref().clone();
    let auth = auth.get_ref().clone();
    actix_web::rt::spawn(run_session(session, msg_stream, query.order_id, token, api, registry, auth));
    Ok(response)
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(actix_web::http::header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}

async fn run_session<B: ChatBackend>(
    mut session: Session,
    mut msg_stream: MessageStream,
    order_id: OrderId,
    token: Option<String>,
    api: Arc<ChatApi<B>>,
    registry: ChatRegistry,
    auth: AuthConfig,
) {
    let (user_id, decision) = match authorize(&api, &order_id, token.as_deref(), &auth).await {
        Ok(granted) => granted,
        Err(reason) => {
            let _ = session.close(Some(reason)).await;
            return;
        },
    };

    let (conn_id, mut rx) = registry.join(&order_id);
    info!("🗨️ User [{user_id}] connected to chat for order [{order_id}] as connection {conn_id}");

    let connected = ChatEvent::Permissions { can_write: decision.can_write, role: decision.role };
    let mut alive = send_event(&mut session, &connected).await;
    if alive {
        match api.history(&order_id, &user_id).await {
            Ok(messages) => alive = send_event(&mut session, &ChatEvent::History { messages }).await,
            Err(e) => {
                warn!("🗨️ Could not load history for order [{order_id}]: {e}");
                alive = false;
            },
        }
    }

    let reason = if alive {
        session_loop(&mut session, &mut msg_stream, &mut rx, &api, &registry, &order_id, &user_id).await
    } else {
        None
    };

    registry.leave(&order_id, conn_id);
    info!("🗨️ User [{user_id}] disconnected from chat for order [{order_id}]");
    let _ = session.close(reason).await;
}

/// The pre-join phase of a connection: token validation, then the access check. An `Err` carries
/// the close frame for the client; a connection joins the registry and receives `permissions` and
/// `history` only after this has passed.
async fn authorize<B: ChatBackend>(
    api: &ChatApi<B>,
    order_id: &OrderId,
    token: Option<&str>,
    auth: &AuthConfig,
) -> Result<(UserId, AccessDecision), CloseReason> {
    let user_id = match token.map(|t| decode_token(t, auth)) {
        Some(Ok(claims)) => claims.sub,
        Some(Err(e)) => {
            debug!("🗨️ Rejecting chat connection for order [{order_id}]: {e}");
            return Err(close_reason("Invalid access token"));
        },
        None => {
            debug!("🗨️ Rejecting chat connection for order [{order_id}]: no token supplied");
            return Err(close_reason("No access token"));
        },
    };
    let decision = match api.check_access(order_id, &user_id).await {
        Ok(d) => d,
        Err(e) => {
            warn!("🗨️ Could not evaluate chat access for order [{order_id}]: {e}");
            return Err(CloseReason::from(CloseCode::Error));
        },
    };
    if !decision.has_access {
        debug!("🗨️ User [{user_id}] has no access to order [{order_id}]. Closing socket.");
        return Err(close_reason("No access to this order"));
    }
    Ok((user_id, decision))
}

async fn session_loop<B: ChatBackend>(
    session: &mut Session,
    msg_stream: &mut MessageStream,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<ChatEvent>,
    api: &ChatApi<B>,
    registry: &ChatRegistry,
    order_id: &OrderId,
    user_id: &UserId,
) -> Option<CloseReason> {
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    if !send_event(session, &event).await {
                        break None;
                    }
                },
                None => break None,
            },
            msg = msg_stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    handle_frame(api, registry, order_id, user_id, &text).await;
                },
                Some(Ok(Message::Ping(bytes))) => {
                    if session.pong(&bytes).await.is_err() {
                        break None;
                    }
                },
                Some(Ok(Message::Close(reason))) => break reason,
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    debug!("🗨️ Protocol error on chat socket for order [{order_id}]: {e}");
                    break Some(CloseReason::from(CloseCode::Protocol));
                },
                None => break None,
            },
        }
    }
}

async fn handle_frame<B: ChatBackend>(
    api: &ChatApi<B>,
    registry: &ChatRegistry,
    order_id: &OrderId,
    user_id: &UserId,
    frame: &str,
) -> SendOutcome {
    match serde_json::from_str::<ClientRequest>(frame) {
        Ok(ClientRequest::Send(send)) => {
            if send.order_id.as_ref().is_some_and(|id| id != order_id) {
                debug!("🗨️ Frame from [{user_id}] addressed to a different order than its socket");
                return SendOutcome::DroppedSilently;
            }
            handle_send(api, registry, order_id, user_id, &send.text).await
        },
        Err(e) => {
            debug!("🗨️ Unparseable frame from [{user_id}] on order [{order_id}]: {e}");
            SendOutcome::DroppedSilently
        },
    }
}

/// Push one message through the engine and fan it out on success.
///
/// Access is re-evaluated inside `post_message` on every send. Rejections are dropped without
/// feedback; the sender's socket stays open and other members see nothing.
pub(crate) async fn handle_send<B: ChatBackend>(
    api: &ChatApi<B>,
    registry: &ChatRegistry,
    order_id: &OrderId,
    user_id: &UserId,
    text: &str,
) -> SendOutcome {
    match api.post_message(order_id, user_id, text).await {
        Ok(message) => {
            let delivered = registry.broadcast(order_id, &ChatEvent::Message(message));
            trace!("🗨️ Message on order [{order_id}] fanned out to {delivered} connections");
            SendOutcome::Delivered(delivered)
        },
        Err(ChatApiError::AccessDenied) | Err(ChatApiError::EmptyMessage) => {
            debug!("🗨️ Dropping message from [{user_id}] on order [{order_id}]");
            SendOutcome::DroppedSilently
        },
        Err(e) => {
            warn!("🗨️ Could not store message on order [{order_id}]: {e}");
            SendOutcome::DroppedSilently
        },
    }
}

async fn send_event(session: &mut Session, event: &ChatEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => session.text(json).await.is_ok(),
        Err(e) => {
            error!("🗨️ Could not serialize chat event: {e}");
            false
        },
    }
}

fn close_reason(description: &str) -> CloseReason {
    CloseReason { code: CloseCode::Policy, description: Some(description.to_string()) }
}
