//! 管理员接口

use axum::Json;
use axum::extract::State;
use docreview_common::{PagedResult, Pagination, UserId};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::http::AppState;
use crate::api::http::extract::{ApiJson, ApiPath, ApiQuery, BearerToken};
use crate::application::account::UpdateUserAccessCommand;
use crate::application::workflow::AssignReviewerCommand;
use crate::application::{DocumentView, UserView};
use crate::domain::{DocumentId, Role};
use crate::error::WorkflowError;

/// GET /admin/documents
pub async fn list_documents(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<DocumentView>>, WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Administrator]).await?;
    Ok(Json(state.workflow.list_visible_documents(&identity).await?))
}

#[derive(Debug, Deserialize)]
pub struct AssignReviewerRequest {
    pub reviewer_id: Uuid,
}

/// POST /admin/documents/{id}/assign-reviewer
pub async fn assign_reviewer(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiPath(document_id): ApiPath<i64>,
    ApiJson(req): ApiJson<AssignReviewerRequest>,
) -> Result<Json<DocumentView>, WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Administrator]).await?;
    let document = state
        .workflow
        .assign_reviewer(
            &identity,
            AssignReviewerCommand {
                document_id: DocumentId(document_id),
                reviewer_id: UserId::from_uuid(req.reviewer_id),
            },
        )
        .await?;
    Ok(Json(document))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiQuery(query): ApiQuery<ListUsersQuery>,
) -> Result<Json<PagedResult<UserView>>, WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Administrator]).await?;
    let defaults = Pagination::default();
    let pagination = Pagination::new(
        query.page.unwrap_or(defaults.page),
        query.page_size.unwrap_or(defaults.page_size),
    );
    Ok(Json(state.accounts.list_users(&identity, pagination).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserAccessRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// PATCH /admin/users/{id}
pub async fn update_user_access(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateUserAccessRequest>,
) -> Result<Json<UserView>, WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Administrator]).await?;
    let role = req
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .map_err(WorkflowError::Validation)?;

    let user = state
        .accounts
        .update_user_access(
            &identity,
            UpdateUserAccessCommand {
                user_id: UserId::from_uuid(user_id),
                role,
                is_active: req.is_active,
            },
        )
        .await?;
    Ok(Json(user))
}
