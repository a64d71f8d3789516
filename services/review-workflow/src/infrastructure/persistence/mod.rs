//! 持久化实现

mod memory;
mod postgres_document_repository;
mod postgres_evaluation_repository;
mod postgres_user_repository;

use std::sync::Arc;

use sqlx::PgPool;

pub use memory::{InMemoryDocumentRepository, InMemoryEvaluationRepository, InMemoryUserRepository};
pub use postgres_document_repository::PostgresDocumentRepository;
pub use postgres_evaluation_repository::PostgresEvaluationRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::{DocumentRepository, EvaluationRepository, UserRepository};

/// Repository 集合
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub evaluations: Arc<dyn EvaluationRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            documents: Arc::new(PostgresDocumentRepository::new(pool.clone())),
            evaluations: Arc::new(PostgresEvaluationRepository::new(pool)),
        }
    }
}
