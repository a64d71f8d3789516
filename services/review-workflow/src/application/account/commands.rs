//! 账号相关命令定义

use docreview_common::UserId;

use crate::domain::Role;

pub const MAX_DISPLAY_NAME_LEN: usize = 255;

/// 注册命令
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    /// 缺省为 submitter
    pub role: Option<String>,
}

impl RegisterUserCommand {
    /// 解析请求的角色
    pub fn requested_role(&self) -> Result<Role, String> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(Role::Submitter),
            Some(role) => role.parse(),
        }
    }

    /// 规范化显示名称（去除空白，空串视为未提供）
    pub fn normalized_display_name(&self) -> Result<Option<String>, String> {
        match self.display_name.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LEN => Err(format!(
                "Display name cannot exceed {} characters",
                MAX_DISPLAY_NAME_LEN
            )),
            Some(name) => Ok(Some(name.to_string())),
        }
    }
}

/// 登录命令
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// 更新用户访问权限命令
#[derive(Debug, Clone)]
pub struct UpdateUserAccessCommand {
    pub user_id: UserId,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UpdateUserAccessCommand {
    pub fn validate(&self) -> Result<(), String> {
        if self.role.is_none() && self.is_active.is_none() {
            return Err("At least one of role or is_active must be provided".to_string());
        }
        Ok(())
    }
}
