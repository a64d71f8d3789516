//! 账号管理

pub mod commands;
mod service;

pub use commands::*;
pub use service::{AccountService, MAX_PAGE_SIZE, TokenResponse};
