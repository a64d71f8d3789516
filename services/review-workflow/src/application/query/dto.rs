//! 读取投影

use chrono::{DateTime, Utc};
use docreview_common::UserId;
use serde::Serialize;

use crate::domain::{DocumentId, EvaluationId, ReviewStage, Role, User};

/// 文档投影
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub id: DocumentId,
    pub title: String,
    pub organization: String,
    pub storage_key: String,
    pub url: String,
    pub owner_id: UserId,
    pub uploaded_by: Option<String>,
    pub assigned_reviewer_id: Option<UserId>,
    pub assigned_reviewer_email: Option<String>,
    pub stage: ReviewStage,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub evaluations: Vec<EvaluationView>,
}

/// 评审投影
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub id: EvaluationId,
    pub document_id: DocumentId,
    pub reviewer_id: UserId,
    pub reviewer_email: Option<String>,
    pub comment: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// 用户投影
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.to_string(),
            display_name: user.display_name.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.timestamps.created_at,
        }
    }
}
