//! 身份解析与角色校验
//!
//! 每个受保护操作都按 resolve → require → 业务操作 的顺序执行

use std::sync::Arc;

use docreview_auth_core::TokenService;
use tracing::{debug, warn};

use crate::domain::{Identity, Role, UserRepository};
use crate::error::{WorkflowError, WorkflowResult};

/// 令牌 → 已认证主体
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// 任何令牌校验失败都归为 Unauthenticated
    pub async fn resolve(&self, bearer_token: &str) -> WorkflowResult<Identity> {
        let claims = self.tokens.verify_access_token(bearer_token).map_err(|e| {
            debug!(error = %e, "Token rejected");
            WorkflowError::Unauthenticated
        })?;

        let user_id = claims.user_id().map_err(|_| {
            warn!("Token subject is not a user id");
            WorkflowError::Unauthenticated
        })?;

        match self.users.find_by_id(&user_id).await? {
            Some(user) => Ok(user.identity()),
            None => {
                warn!(user_id = %user_id, "Token subject does not resolve to a user");
                Err(WorkflowError::Unauthenticated)
            }
        }
    }
}

/// 角色校验
pub struct RoleGate;

impl RoleGate {
    /// 先检查账号是否启用，再检查角色
    pub fn require<'a>(identity: &'a Identity, allowed: &[Role]) -> WorkflowResult<&'a Identity> {
        if !identity.is_active {
            warn!(user_id = %identity.id, "Inactive account rejected");
            return Err(WorkflowError::InactiveAccount);
        }

        if !allowed.contains(&identity.role) {
            warn!(
                user_id = %identity.id,
                role = %identity.role,
                "Role not permitted"
            );
            return Err(WorkflowError::forbidden(format!(
                "Role '{}' is not permitted to perform this action",
                identity.role
            )));
        }

        Ok(identity)
    }

    /// 任意角色，仅要求账号启用
    pub fn require_active(identity: &Identity) -> WorkflowResult<&Identity> {
        Self::require(identity, &Role::ALL)
    }
}

/// 组合 resolve 与 require
#[derive(Clone)]
pub struct AccessGuard {
    resolver: IdentityResolver,
}

impl AccessGuard {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    pub async fn authorize(&self, bearer_token: &str, allowed: &[Role]) -> WorkflowResult<Identity> {
        let identity = self.resolver.resolve(bearer_token).await?;
        RoleGate::require(&identity, allowed)?;
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::domain::value_objects::{Email, HashedPassword};
    use crate::infrastructure::persistence::InMemoryUserRepository;
    use docreview_common::UserId;

    const SECRET: &str = "unit-test-secret-key-32-characters!!";

    fn user(email: &str, role: Role) -> User {
        User::new(
            Email::new(email).unwrap(),
            HashedPassword::from_hash("$argon2id$fixture"),
            None,
            role,
        )
    }

    async fn setup() -> (Arc<TokenService>, Arc<InMemoryUserRepository>, IdentityResolver) {
        let tokens = Arc::new(TokenService::new(SECRET, 600, "docreview", "docreview-api"));
        let users = Arc::new(InMemoryUserRepository::new());
        let resolver = IdentityResolver::new(tokens.clone(), users.clone());
        (tokens, users, resolver)
    }

    #[tokio::test]
    async fn test_resolve_known_user() {
        let (tokens, users, resolver) = setup().await;
        let reviewer = user("r1@example.org", Role::Reviewer);
        users.create(&reviewer).await.unwrap();

        let token = tokens
            .issue_access_token(&reviewer.id, reviewer.email.as_str(), "reviewer")
            .unwrap();
        let identity = resolver.resolve(&token.token).await.unwrap();

        assert_eq!(identity.id, reviewer.id);
        assert_eq!(identity.role, Role::Reviewer);
    }

    #[tokio::test]
    async fn test_resolve_unknown_subject_is_unauthenticated() {
        let (tokens, _users, resolver) = setup().await;
        let token = tokens
            .issue_access_token(&UserId::new(), "ghost@example.org", "administrator")
            .unwrap();

        let err = resolver.resolve(&token.token).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_resolve_expired_or_tampered_token() {
        let (_tokens, users, resolver) = setup().await;
        let submitter = user("s@example.org", Role::Submitter);
        users.create(&submitter).await.unwrap();

        let expired = TokenService::new(SECRET, -60, "docreview", "docreview-api")
            .issue_access_token(&submitter.id, "s@example.org", "submitter")
            .unwrap();
        assert!(matches!(
            resolver.resolve(&expired.token).await,
            Err(WorkflowError::Unauthenticated)
        ));

        let forged = TokenService::new(
            "a-completely-different-secret-value!",
            600,
            "docreview",
            "docreview-api",
        )
        .issue_access_token(&submitter.id, "s@example.org", "submitter")
        .unwrap();
        assert!(matches!(
            resolver.resolve(&forged.token).await,
            Err(WorkflowError::Unauthenticated)
        ));

        assert!(matches!(
            resolver.resolve("garbage").await,
            Err(WorkflowError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_role_change_takes_effect_immediately() {
        let (tokens, users, resolver) = setup().await;
        let account = user("r@example.org", Role::Reviewer);
        users.create(&account).await.unwrap();
        let token = tokens
            .issue_access_token(&account.id, "r@example.org", "reviewer")
            .unwrap();

        users
            .update_access(&account.id, Role::Submitter, true)
            .await
            .unwrap();

        let identity = resolver.resolve(&token.token).await.unwrap();
        assert_eq!(identity.role, Role::Submitter);
    }

    #[test]
    fn test_gate_checks_active_before_role() {
        let mut identity = user("r@example.org", Role::Reviewer).identity();
        identity.is_active = false;

        // 角色不匹配时也应先报告账号停用
        let err = RoleGate::require(&identity, &[Role::Administrator]).unwrap_err();
        assert!(matches!(err, WorkflowError::InactiveAccount));

        let err = RoleGate::require(&identity, &[Role::Reviewer]).unwrap_err();
        assert!(matches!(err, WorkflowError::InactiveAccount));
    }

    #[test]
    fn test_gate_role_membership() {
        let identity = user("s@example.org", Role::Submitter).identity();
        assert!(RoleGate::require(&identity, &[Role::Submitter]).is_ok());
        assert!(RoleGate::require_active(&identity).is_ok());
        assert!(matches!(
            RoleGate::require(&identity, &[Role::Reviewer, Role::Administrator]),
            Err(WorkflowError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_guard_composes_resolve_and_require() {
        let (tokens, users, resolver) = setup().await;
        let guard = AccessGuard::new(resolver);
        let admin = user("admin@example.org", Role::Administrator);
        users.create(&admin).await.unwrap();
        let token = tokens
            .issue_access_token(&admin.id, "admin@example.org", "administrator")
            .unwrap();

        assert!(guard.authorize(&token.token, &[Role::Administrator]).await.is_ok());
        assert!(matches!(
            guard.authorize(&token.token, &[Role::Reviewer]).await,
            Err(WorkflowError::Forbidden(_))
        ));
    }
}
