//! 用户实体与角色

use docreview_common::{Timestamps, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value_objects::{Email, HashedPassword};

/// 角色（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "grantee")]
    Submitter,
    Reviewer,
    #[serde(alias = "admin")]
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Submitter, Role::Reviewer, Role::Administrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Submitter => "submitter",
            Role::Reviewer => "reviewer",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitter" | "grantee" => Ok(Role::Submitter),
            "reviewer" => Ok(Role::Reviewer),
            "administrator" | "admin" => Ok(Role::Administrator),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// 用户实体
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: HashedPassword,
    pub display_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub timestamps: Timestamps,
}

impl User {
    pub fn new(
        email: Email,
        password_hash: HashedPassword,
        display_name: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            display_name,
            role,
            is_active: true,
            timestamps: Timestamps::new(),
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// 投影为已认证主体（不含密码哈希）
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            is_active: self.is_active,
        }
    }
}

/// 已认证主体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
}
