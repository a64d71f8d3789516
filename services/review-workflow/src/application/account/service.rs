//! 账号服务：注册、登录、用户管理

use std::sync::{Arc, LazyLock};

use docreview_auth_core::TokenService;
use docreview_common::{PagedResult, Pagination};
use docreview_errors::AppError;
use serde::Serialize;
use tracing::{info, warn};

use super::commands::*;
use crate::application::access::RoleGate;
use crate::application::query::UserView;
use crate::domain::value_objects::{Email, HashedPassword};
use crate::domain::{Identity, Role, User, UserRepository};
use crate::error::{WorkflowError, WorkflowResult};

/// 用户列表每页上限
pub const MAX_PAGE_SIZE: u32 = 500;

/// 未知邮箱登录时用于校验的哈希，使两条失败路径耗时相近
static DUMMY_HASH: LazyLock<Option<HashedPassword>> =
    LazyLock::new(|| HashedPassword::from_plain("NoSuchAccount0").ok());

fn burn_dummy_verify(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = hash.verify(password);
    }
}

/// 登录结果
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// 账号服务
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// 注册
    pub async fn register(&self, cmd: RegisterUserCommand) -> WorkflowResult<UserView> {
        let email = Email::new(&cmd.email)?;
        let role = cmd.requested_role().map_err(WorkflowError::Validation)?;
        let display_name = cmd
            .normalized_display_name()
            .map_err(WorkflowError::Validation)?;

        if role == Role::Administrator {
            warn!(email = %email, "Administrator self-registration rejected");
            return Err(WorkflowError::forbidden(
                "Administrator accounts cannot be self-registered",
            ));
        }

        if self.users.exists_by_email(&email).await? {
            return Err(WorkflowError::conflict("Email already registered"));
        }

        let password_hash = HashedPassword::from_plain(&cmd.password)?;
        let user = User::new(email, password_hash, display_name, role);
        self.create_user(&user).await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(UserView::from(&user))
    }

    /// 登录
    pub async fn login(&self, cmd: LoginCommand) -> WorkflowResult<TokenResponse> {
        let email = Email::new(&cmd.email).map_err(|_| WorkflowError::Unauthenticated)?;

        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                burn_dummy_verify(&cmd.password);
                warn!("Login attempt for unknown email");
                return Err(WorkflowError::Unauthenticated);
            }
        };

        if !user.password_hash.verify(&cmd.password)? {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(WorkflowError::Unauthenticated);
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login rejected: account inactive");
            return Err(WorkflowError::InactiveAccount);
        }

        let issued = self
            .tokens
            .issue_access_token(&user.id, user.email.as_str(), user.role.as_str())?;

        info!(user_id = %user.id, "User logged in");
        Ok(TokenResponse {
            access_token: issued.token,
            token_type: "bearer".to_string(),
            expires_in: issued.expires_in,
        })
    }

    /// 当前用户
    pub async fn current_user(&self, identity: &Identity) -> WorkflowResult<UserView> {
        RoleGate::require_active(identity)?;

        let user = self
            .users
            .find_by_id(&identity.id)
            .await?
            .ok_or(WorkflowError::Unauthenticated)?;
        Ok(UserView::from(&user))
    }

    /// 用户列表（管理员）
    pub async fn list_users(
        &self,
        identity: &Identity,
        pagination: Pagination,
    ) -> WorkflowResult<PagedResult<UserView>> {
        RoleGate::require(identity, &[Role::Administrator])?;

        let pagination = pagination.clamped(MAX_PAGE_SIZE);
        let (users, total) = self.users.list(&pagination).await?;
        let items = users.iter().map(UserView::from).collect();
        Ok(PagedResult::new(items, total, &pagination))
    }

    /// 更新用户角色或启用状态（管理员）
    pub async fn update_user_access(
        &self,
        identity: &Identity,
        cmd: UpdateUserAccessCommand,
    ) -> WorkflowResult<UserView> {
        RoleGate::require(identity, &[Role::Administrator])?;
        cmd.validate().map_err(WorkflowError::Validation)?;

        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("User {} not found", cmd.user_id)))?;

        let role = cmd.role.unwrap_or(user.role);
        let is_active = cmd.is_active.unwrap_or(user.is_active);

        if user.id == identity.id && (role != user.role || !is_active) {
            return Err(WorkflowError::validation(
                "Administrators cannot change their own role or deactivate themselves",
            ));
        }

        if !self.users.update_access(&user.id, role, is_active).await? {
            return Err(WorkflowError::not_found(format!(
                "User {} not found",
                cmd.user_id
            )));
        }

        info!(
            user_id = %user.id,
            role = %role,
            is_active,
            updated_by = %identity.id,
            "User access updated"
        );

        let updated = self
            .users
            .find_by_id(&user.id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("User {} not found", user.id)))?;
        Ok(UserView::from(&updated))
    }

    /// 确保启动管理员存在；已存在时不做修改
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password: &str,
    ) -> WorkflowResult<bool> {
        let email = Email::new(email)?;
        if self.users.exists_by_email(&email).await? {
            info!(email = %email, "Bootstrap administrator already present");
            return Ok(false);
        }

        let password_hash = HashedPassword::from_plain(password)?;
        let user = User::new(email, password_hash, None, Role::Administrator);
        self.create_user(&user).await?;

        info!(user_id = %user.id, "Bootstrap administrator created");
        Ok(true)
    }

    async fn create_user(&self, user: &User) -> WorkflowResult<()> {
        match self.users.create(user).await {
            Ok(()) => Ok(()),
            Err(AppError::Conflict(_)) => Err(WorkflowError::conflict("Email already registered")),
            Err(e) => Err(e.into()),
        }
    }
}
