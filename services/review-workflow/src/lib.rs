//! Review Workflow Service
//!
//! 文档提交、审稿人指派与评审记录，按角色限定可见范围

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod runtime;

pub use api::http::{AppState, router};
pub use error::{WorkflowError, WorkflowResult};
