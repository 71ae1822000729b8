//! Locket relay: a Telegram bot that logs chats into the Locket API and
//! forwards their photos to it.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging and the HTTP listener
//! - `relay`: per-chat sessions, the Locket API client and the login/upload flows
//! - `telegram`: bot creation and the dispatcher handler tree
//! - `cli`: command-line entry points

pub mod cli;
pub mod core;
pub mod relay;
pub mod telegram;

pub use core::{config, AppError};
pub use relay::SessionRelay;
