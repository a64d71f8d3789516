//! 工作流命令定义

use docreview_common::UserId;

use crate::domain::DocumentId;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_ORGANIZATION_LEN: usize = 255;
pub const MAX_COMMENT_LEN: usize = 10_000;
pub const MAX_STATUS_LEN: usize = 64;

fn check_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    if value.chars().count() > max_len {
        return Err(format!("{} cannot exceed {} characters", field, max_len));
    }
    Ok(())
}

/// 提交文档命令（内容已上传）
#[derive(Debug, Clone)]
pub struct SubmitDocumentCommand {
    pub title: String,
    pub organization: String,
    pub storage_key: String,
    pub url: String,
}

impl SubmitDocumentCommand {
    pub fn validate(&self) -> Result<(), String> {
        check_text("Title", &self.title, MAX_TITLE_LEN)?;
        check_text("Organization", &self.organization, MAX_ORGANIZATION_LEN)
    }
}

/// 上传并提交命令
#[derive(Debug, Clone)]
pub struct UploadDocumentCommand {
    pub title: String,
    pub organization: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadDocumentCommand {
    pub fn validate(&self) -> Result<(), String> {
        check_text("Title", &self.title, MAX_TITLE_LEN)?;
        check_text("Organization", &self.organization, MAX_ORGANIZATION_LEN)?;
        if self.bytes.is_empty() {
            return Err("Uploaded file is empty".to_string());
        }
        Ok(())
    }
}

/// 指派审稿人命令
#[derive(Debug, Clone)]
pub struct AssignReviewerCommand {
    pub document_id: DocumentId,
    pub reviewer_id: UserId,
}

/// 提交评审命令
#[derive(Debug, Clone)]
pub struct EvaluateDocumentCommand {
    pub document_id: DocumentId,
    pub comment: String,
    pub status: String,
}

impl EvaluateDocumentCommand {
    pub fn validate(&self) -> Result<(), String> {
        check_text("Comment", &self.comment, MAX_COMMENT_LEN)?;
        check_text("Status", &self.status, MAX_STATUS_LEN)
    }
}
