//! 评审实体

use docreview_common::{Timestamps, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::document::DocumentId;

/// 评审 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub i64);

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 评审实体，只追加
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub document_id: DocumentId,
    pub reviewer_id: UserId,
    pub comment: String,
    pub status: String,
    pub timestamps: Timestamps,
}

/// 待创建的评审
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub document_id: DocumentId,
    pub reviewer_id: UserId,
    pub comment: String,
    pub status: String,
}

impl NewEvaluation {
    pub fn into_evaluation(self, id: EvaluationId) -> Evaluation {
        Evaluation {
            id,
            document_id: self.document_id,
            reviewer_id: self.reviewer_id,
            comment: self.comment,
            status: self.status,
            timestamps: Timestamps::new(),
        }
    }
}
