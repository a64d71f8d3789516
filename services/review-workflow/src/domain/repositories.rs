//! Repository traits

use async_trait::async_trait;
use docreview_common::{Pagination, UserId};
use docreview_errors::AppResult;

use super::document::{Document, DocumentId, NewDocument};
use super::evaluation::{Evaluation, NewEvaluation};
use super::user::{Role, User};
use super::value_objects::Email;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &Email) -> AppResult<Option<User>>;

    /// 检查邮箱是否存在
    async fn exists_by_email(&self, email: &Email) -> AppResult<bool>;

    /// 创建用户，邮箱重复时返回 Conflict
    async fn create(&self, user: &User) -> AppResult<()>;

    /// 更新角色与启用状态，用户不存在时返回 false
    async fn update_access(&self, id: &UserId, role: Role, is_active: bool) -> AppResult<bool>;

    /// 按创建时间升序分页
    async fn list(&self, pagination: &Pagination) -> AppResult<(Vec<User>, u64)>;
}

/// 文档可见范围
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFilter {
    All,
    OwnedBy(UserId),
    AssignedTo(UserId),
}

impl DocumentFilter {
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::OwnedBy(owner) => document.is_owned_by(owner),
            Self::AssignedTo(reviewer) => document.is_assigned_to(reviewer),
        }
    }
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, document: NewDocument) -> AppResult<Document>;

    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>>;

    /// 按 ID 升序
    async fn list(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>>;

    /// 条件更新：仅当版本等于 `expected_version` 时写入并递增版本
    async fn assign_reviewer(
        &self,
        id: DocumentId,
        reviewer_id: &UserId,
        expected_version: i64,
    ) -> AppResult<bool>;
}

#[async_trait]
pub trait EvaluationRepository: Send + Sync {
    async fn create(&self, evaluation: NewEvaluation) -> AppResult<Evaluation>;

    /// 按 ID 升序
    async fn list_by_document(&self, document_id: DocumentId) -> AppResult<Vec<Evaluation>>;
}
