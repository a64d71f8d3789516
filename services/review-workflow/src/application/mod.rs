//! 应用层

pub mod access;
pub mod account;
pub mod query;
pub mod workflow;

pub use access::{AccessGuard, IdentityResolver, RoleGate};
pub use account::AccountService;
pub use query::{AccessScopedQueries, DocumentView, EvaluationView, UserView};
pub use workflow::{DocumentWorkflow, WorkflowPolicy};
