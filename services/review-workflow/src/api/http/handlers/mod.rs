//! HTTP 处理器

pub mod account;
pub mod admin;
pub mod documents;
pub mod system;
