//! 文档实体

use docreview_common::{Timestamps, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::error::{WorkflowError, WorkflowResult};

/// 文档 ID（由持久化层分配，递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub i64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 内容引用，设置后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReference {
    storage_key: String,
    url: String,
}

impl ContentReference {
    pub fn new(storage_key: impl Into<String>, url: impl Into<String>) -> WorkflowResult<Self> {
        let storage_key = storage_key.into().trim().to_string();
        let url = url.into().trim().to_string();

        if storage_key.is_empty() {
            return Err(WorkflowError::validation("Storage key is required"));
        }

        Url::parse(&url)
            .map_err(|e| WorkflowError::validation(format!("Invalid content URL: {}", e)))?;

        Ok(Self { storage_key, url })
    }

    /// 从存储中还原，不做校验
    pub(crate) fn from_stored(storage_key: String, url: String) -> Self {
        Self { storage_key, url }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// 评审阶段（读取时推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    Unassigned,
    Assigned,
    Evaluated,
}

impl ReviewStage {
    pub fn derive(has_reviewer: bool, evaluation_count: usize) -> Self {
        if evaluation_count > 0 {
            Self::Evaluated
        } else if has_reviewer {
            Self::Assigned
        } else {
            Self::Unassigned
        }
    }
}

/// 文档实体
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub organization: String,
    pub content: ContentReference,
    pub owner_id: UserId,
    pub assigned_reviewer_id: Option<UserId>,
    /// 乐观锁版本，每次指派审稿人递增
    pub version: i64,
    pub timestamps: Timestamps,
}

impl Document {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assigned_reviewer_id.as_ref() == Some(user_id)
    }
}

/// 待创建的文档
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub organization: String,
    pub content: ContentReference,
    pub owner_id: UserId,
}

impl NewDocument {
    /// 由持久化层分配 ID 后生成实体
    pub fn into_document(self, id: DocumentId) -> Document {
        Document {
            id,
            title: self.title,
            organization: self.organization,
            content: self.content,
            owner_id: self.owner_id,
            assigned_reviewer_id: None,
            version: 1,
            timestamps: Timestamps::new(),
        }
    }
}
