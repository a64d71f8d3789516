//! 内存 Repository 实现（测试与本地演示）

use std::collections::BTreeMap;

use async_trait::async_trait;
use docreview_common::{Pagination, UserId};
use docreview_errors::{AppError, AppResult};
use tokio::sync::RwLock;

use crate::domain::value_objects::Email;
use crate::domain::{
    Document, DocumentFilter, DocumentId, DocumentRepository, Evaluation, EvaluationId,
    EvaluationRepository, NewDocument, NewEvaluation, Role, User, UserRepository,
};

/// 用户存储，按插入顺序保存
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users.iter().any(|u| &u.email == email))
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email || u.id == user.id) {
            return Err(AppError::conflict("Duplicate entry violates unique constraint"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update_access(&self, id: &UserId, role: Role, is_active: bool) -> AppResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| &u.id == id) {
            Some(user) => {
                user.role = role;
                user.is_active = is_active;
                user.timestamps.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, pagination: &Pagination) -> AppResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        let page = users
            .iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(pagination.page_size as usize)
            .cloned()
            .collect();
        Ok((page, users.len() as u64))
    }
}

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// 文档存储
#[derive(Default)]
pub struct InMemoryDocumentRepository {
    table: RwLock<Table<Document>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, document: NewDocument) -> AppResult<Document> {
        let mut table = self.table.write().await;
        let id = DocumentId(table.allocate_id());
        let document = document.into_document(id);
        table.rows.insert(id.0, document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id.0).cloned())
    }

    async fn list(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect())
    }

    async fn assign_reviewer(
        &self,
        id: DocumentId,
        reviewer_id: &UserId,
        expected_version: i64,
    ) -> AppResult<bool> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id.0) {
            Some(document) if document.version == expected_version => {
                document.assigned_reviewer_id = Some(reviewer_id.clone());
                document.version += 1;
                document.timestamps.touch();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// 评审存储
#[derive(Default)]
pub struct InMemoryEvaluationRepository {
    table: RwLock<Table<Evaluation>>,
}

impl InMemoryEvaluationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

#[async_trait]
impl EvaluationRepository for InMemoryEvaluationRepository {
    async fn create(&self, evaluation: NewEvaluation) -> AppResult<Evaluation> {
        let mut table = self.table.write().await;
        let id = EvaluationId(table.allocate_id());
        let evaluation = evaluation.into_evaluation(id);
        table.rows.insert(id.0, evaluation.clone());
        Ok(evaluation)
    }

    async fn list_by_document(&self, document_id: DocumentId) -> AppResult<Vec<Evaluation>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|e| e.document_id == document_id)
            .cloned()
            .collect())
    }
}
