//! # Marketplace server
//!
//! The HTTP and WebSocket surface over the order engine. It is responsible for:
//! * Authenticating callers via short-lived JWTs and resolving them to user ids.
//! * Exposing the order lifecycle (create, fetch, list, pay) as a REST API under `/api`.
//! * Hosting the per-order chat gateway at `/ws/chat`, which relays messages between the live
//!   members of an order's conversation.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.

pub mod auth;
pub mod chat;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
