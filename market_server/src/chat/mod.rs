//! The live chat gateway.
//!
//! One WebSocket connection corresponds to one (order, user) pair. Connections that survive the
//! handshake join the order's room in the [`ChatRegistry`]; messages posted by any member are
//! fanned out to every live member of the room, including the sender.

mod events;
mod registry;
mod session;

pub use events::{ChatEvent, ClientRequest, SendRequest};
pub use registry::{ChatRegistry, ConnId};
pub use session::chat_ws;
