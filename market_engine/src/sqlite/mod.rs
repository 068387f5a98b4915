pub mod db;
mod sqlite_impl;

pub use db::{db_url, new_pool, run_migrations};
pub use sqlite_impl::SqliteDatabase;
