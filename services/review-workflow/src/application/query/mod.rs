//! 访问范围查询层

mod dto;
mod service;

pub use dto::{DocumentView, EvaluationView, UserView};
pub use service::AccessScopedQueries;
