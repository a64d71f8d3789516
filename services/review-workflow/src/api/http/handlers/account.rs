//! 注册、登录、当前用户

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::http::AppState;
use crate::api::http::extract::{ApiJson, BearerToken};
use crate::application::UserView;
use crate::application::account::{LoginCommand, RegisterUserCommand, TokenResponse};
use crate::domain::Role;
use crate::error::WorkflowError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default, alias = "full_name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: String,
    pub user: UserView,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), WorkflowError> {
    let user = state
        .accounts
        .register(RegisterUserCommand {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
            role: req.role,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, WorkflowError> {
    let token = state
        .accounts
        .login(LoginCommand {
            email: req.email,
            password: req.password,
        })
        .await?;
    Ok(Json(token))
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<DashboardResponse>, WorkflowError> {
    let identity = state.guard.authorize(&token, &Role::ALL).await?;
    let user = state.accounts.current_user(&identity).await?;
    Ok(Json(DashboardResponse {
        message: format!("Welcome, {} ({})", user.email, user.role),
        user,
    }))
}
