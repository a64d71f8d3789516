//! 工作流错误类型

use docreview_errors::{AppError, ProblemDetails};
use thiserror::Error;

use crate::domain::value_objects::{EmailError, PasswordError};

/// 工作流错误
///
/// 基础设施失败保留在 `Infrastructure` 中，不会被折算为其他分类
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Account is inactive")]
    InactiveAccount,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid assignee: {0}")]
    InvalidAssignee(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Infrastructure(#[from] AppError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

impl WorkflowError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_assignee(msg: impl Into<String>) -> Self {
        Self::InvalidAssignee(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// 指标标签
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::InactiveAccount => "inactive_account",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::InvalidAssignee(_) => "invalid_assignee",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Infrastructure(_) => "infrastructure",
        }
    }

    /// HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::InactiveAccount | Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::InvalidAssignee(_) => 400,
            Self::Validation(_) => 422,
            Self::Conflict(_) => 409,
            Self::Infrastructure(e) => e.status_code(),
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        let status = self.status_code();
        match self {
            Self::Unauthenticated => ProblemDetails::new(
                "unauthenticated",
                "Unauthenticated",
                status,
                "Authentication required",
            ),
            Self::InactiveAccount => ProblemDetails::new(
                "inactive-account",
                "Inactive Account",
                status,
                "Account is inactive",
            ),
            Self::Forbidden(msg) => ProblemDetails::new("forbidden", "Forbidden", status, msg),
            Self::NotFound(msg) => {
                ProblemDetails::new("not-found", "Resource Not Found", status, msg)
            }
            Self::InvalidAssignee(msg) => {
                ProblemDetails::new("invalid-assignee", "Invalid Assignee", status, msg)
            }
            Self::Validation(msg) => {
                ProblemDetails::new("validation", "Validation Error", status, msg)
            }
            Self::Conflict(msg) => ProblemDetails::new("conflict", "Conflict", status, msg),
            Self::Infrastructure(e) => e.to_problem_details(),
        }
    }
}

impl From<EmailError> for WorkflowError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PasswordError> for WorkflowError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::HashingFailed(_) | PasswordError::InvalidHash(_) => {
                Self::Infrastructure(AppError::internal(err.to_string()))
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
