//! 文档工作流

pub mod commands;
mod service;

pub use commands::*;
pub use service::{DocumentWorkflow, WorkflowPolicy};
