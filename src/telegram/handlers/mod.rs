//! Telegram bot handler tree configuration
//!
//! The handler tree is built from [`HandlerDeps`] alone, so tests can drive
//! the same tree as production with a relay wired to fakes.

mod commands;
mod login;
mod schema;
mod types;
mod uploads;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
