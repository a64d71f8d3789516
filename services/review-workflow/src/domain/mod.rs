//! 领域层

pub mod document;
pub mod evaluation;
pub mod repositories;
pub mod user;
pub mod value_objects;

pub use document::{ContentReference, Document, DocumentId, NewDocument, ReviewStage};
pub use evaluation::{Evaluation, EvaluationId, NewEvaluation};
pub use repositories::{DocumentFilter, DocumentRepository, EvaluationRepository, UserRepository};
pub use user::{Identity, Role, User};
