//! 对象存储 trait 定义

use async_trait::async_trait;
use docreview_errors::AppResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 已上传对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// 公开访问地址
    pub public_url: String,
    /// 存储桶内的对象键
    pub storage_key: String,
}

/// 对象存储 trait
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// 上传文件内容，返回可公开访问的地址
    async fn upload(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        file_name: &str,
    ) -> AppResult<StoredObject>;
}

/// 扩展名最大长度
pub const MAX_EXTENSION_LEN: usize = 10;

/// 生成对象键：随机 UUID，保留原文件扩展名
///
/// 扩展名只接受 ASCII 字母数字，否则丢弃
pub fn generate_storage_key(file_name: &str) -> String {
    let id = Uuid::new_v4();
    match file_extension(file_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

fn file_extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext)
}
