mod chat;
mod helpers;
pub(crate) mod mocks;
mod orders;
