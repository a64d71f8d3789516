//! 注册、登录与用户管理

mod common;

use common::TestApp;
use docreview_common::Pagination;
use review_workflow::WorkflowError;
use review_workflow::application::account::{
    LoginCommand, RegisterUserCommand, UpdateUserAccessCommand,
};
use review_workflow::domain::Role;

fn register(email: &str, password: &str, role: Option<&str>) -> RegisterUserCommand {
    RegisterUserCommand {
        email: email.to_string(),
        password: password.to_string(),
        display_name: Some("Test User".to_string()),
        role: role.map(str::to_string),
    }
}

fn login(email: &str, password: &str) -> LoginCommand {
    LoginCommand {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_login_and_resolve() {
    let app = TestApp::new();

    let user = app
        .accounts()
        .register(register("  Grantee@Acme.org ", "Password123", None))
        .await
        .unwrap();
    assert_eq!(user.email, "grantee@acme.org");
    assert_eq!(user.role, Role::Submitter);
    assert!(user.is_active);

    let token = app
        .accounts()
        .login(login("grantee@acme.org", "Password123"))
        .await
        .unwrap();
    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.expires_in, 1800);

    let identity = app
        .state
        .guard
        .authorize(&token.access_token, &[Role::Submitter])
        .await
        .unwrap();
    assert_eq!(identity.id, user.id);

    let me = app.accounts().current_user(&identity).await.unwrap();
    assert_eq!(me.display_name.as_deref(), Some("Test User"));
}

#[tokio::test]
async fn test_register_rejections() {
    let app = TestApp::new();
    app.accounts()
        .register(register("reviewer@example.org", "Password123", Some("reviewer")))
        .await
        .unwrap();

    let err = app
        .accounts()
        .register(register("REVIEWER@example.org", "Password456", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Conflict(_)));

    let err = app
        .accounts()
        .register(register("root@example.org", "Password123", Some("administrator")))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let err = app
        .accounts()
        .register(register("weak@example.org", "password", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = app
        .accounts()
        .register(register("not-an-email", "Password123", None))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = app
        .accounts()
        .register(register("x@example.org", "Password123", Some("superuser")))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.accounts()
        .register(register("grantee@acme.org", "Password123", None))
        .await
        .unwrap();

    for cmd in [
        login("grantee@acme.org", "WrongPassword1"),
        login("nobody@acme.org", "Password123"),
        login("garbage", "Password123"),
    ] {
        let err = app.accounts().login(cmd).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthenticated), "{err:?}");
    }
}

#[tokio::test]
async fn test_inactive_login_after_password_check() {
    let app = TestApp::new();
    let admin = app.add_user("admin@example.org", Role::Administrator).await;
    let user = app
        .accounts()
        .register(register("grantee@acme.org", "Password123", None))
        .await
        .unwrap();

    app.accounts()
        .update_user_access(
            &admin,
            UpdateUserAccessCommand {
                user_id: user.id.clone(),
                role: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

    let err = app
        .accounts()
        .login(login("grantee@acme.org", "Password123"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InactiveAccount));

    let err = app
        .accounts()
        .login(login("grantee@acme.org", "WrongPassword1"))
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Unauthenticated));
}

#[tokio::test]
async fn test_role_change_applies_to_existing_token() {
    let app = TestApp::new();
    let admin = app.add_user("admin@example.org", Role::Administrator).await;
    let user = app.add_user("promoted@example.org", Role::Submitter).await;
    let token = app.token_for(&user);

    let view = app
        .accounts()
        .update_user_access(
            &admin,
            UpdateUserAccessCommand {
                user_id: user.id.clone(),
                role: Some(Role::Reviewer),
                is_active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(view.role, Role::Reviewer);

    let err = app
        .state
        .guard
        .authorize(&token, &[Role::Submitter])
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
    assert!(app.state.guard.authorize(&token, &[Role::Reviewer]).await.is_ok());
}

#[tokio::test]
async fn test_update_user_access_guards() {
    let app = TestApp::new();
    let admin = app.add_user("admin@example.org", Role::Administrator).await;
    let reviewer = app.add_user("reviewer@example.org", Role::Reviewer).await;

    let err = app
        .accounts()
        .update_user_access(
            &admin,
            UpdateUserAccessCommand {
                user_id: admin.id.clone(),
                role: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = app
        .accounts()
        .update_user_access(
            &admin,
            UpdateUserAccessCommand {
                user_id: reviewer.id.clone(),
                role: None,
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Validation(_)));

    let err = app
        .accounts()
        .update_user_access(
            &reviewer,
            UpdateUserAccessCommand {
                user_id: reviewer.id.clone(),
                role: Some(Role::Administrator),
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));

    let err = app
        .accounts()
        .update_user_access(
            &admin,
            UpdateUserAccessCommand {
                user_id: docreview_common::UserId::new(),
                role: Some(Role::Reviewer),
                is_active: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::NotFound(_)));
}

#[tokio::test]
async fn test_list_users_paginates() {
    let app = TestApp::new();
    let admin = app.add_user("admin@example.org", Role::Administrator).await;
    for i in 0..4 {
        app.add_user(&format!("user{i}@example.org"), Role::Submitter)
            .await;
    }

    let page = app
        .accounts()
        .list_users(&admin, Pagination::new(2, 2))
        .await
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 2);

    let clamped = app
        .accounts()
        .list_users(&admin, Pagination::new(0, 10_000))
        .await
        .unwrap();
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.items.len(), 5);

    let beyond = app
        .accounts()
        .list_users(&admin, Pagination::new(u32::MAX, 100))
        .await
        .unwrap();
    assert_eq!(beyond.total, 5);
    assert!(beyond.items.is_empty());

    let submitter = app.add_user("grantee@acme.org", Role::Submitter).await;
    let err = app
        .accounts()
        .list_users(&submitter, Pagination::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Forbidden(_)));
}

#[tokio::test]
async fn test_bootstrap_admin_is_idempotent() {
    let app = TestApp::new();

    assert!(
        app.accounts()
            .ensure_bootstrap_admin("admin@example.org", "Bootstrap123")
            .await
            .unwrap()
    );
    assert!(
        !app.accounts()
            .ensure_bootstrap_admin("admin@example.org", "Different456")
            .await
            .unwrap()
    );

    let token = app
        .accounts()
        .login(login("admin@example.org", "Bootstrap123"))
        .await
        .unwrap();
    let identity = app
        .state
        .guard
        .authorize(&token.access_token, &[Role::Administrator])
        .await
        .unwrap();
    assert_eq!(identity.role, Role::Administrator);
}
