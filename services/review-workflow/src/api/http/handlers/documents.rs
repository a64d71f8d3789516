//! 提交人与审稿人的文档接口

use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::api::http::AppState;
use crate::api::http::extract::{ApiJson, ApiPath, BearerToken};
use crate::application::workflow::{EvaluateDocumentCommand, UploadDocumentCommand};
use crate::application::{DocumentView, EvaluationView};
use crate::domain::{DocumentId, Role};
use crate::error::WorkflowError;

fn multipart_error(e: MultipartError) -> WorkflowError {
    WorkflowError::validation(format!("Invalid multipart body: {}", e))
}

/// POST /submitter/documents
///
/// multipart 字段：`title`、`organization`、`file`
pub async fn upload(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<DocumentView>), WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Submitter]).await?;
    let mut multipart = multipart.map_err(|e| WorkflowError::validation(e.body_text()))?;

    let mut title = None;
    let mut organization = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(field.text().await.map_err(multipart_error)?),
            "organization" => organization = Some(field.text().await.map_err(multipart_error)?),
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| WorkflowError::validation("Missing file field"))?;

    let document = state
        .workflow
        .upload_and_submit(
            &identity,
            UploadDocumentCommand {
                title: title.unwrap_or_default(),
                organization: organization.unwrap_or_default(),
                file_name,
                content_type,
                bytes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /submitter/documents
pub async fn list_submitted(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<DocumentView>>, WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Submitter]).await?;
    Ok(Json(state.workflow.list_visible_documents(&identity).await?))
}

/// GET /reviewer/documents
pub async fn list_assigned(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<DocumentView>>, WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Reviewer]).await?;
    Ok(Json(state.workflow.list_visible_documents(&identity).await?))
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub comment: String,
    pub status: String,
}

/// POST /reviewer/documents/{id}/evaluate
pub async fn evaluate(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiPath(document_id): ApiPath<i64>,
    ApiJson(req): ApiJson<EvaluateRequest>,
) -> Result<(StatusCode, Json<EvaluationView>), WorkflowError> {
    let identity = state.guard.authorize(&token, &[Role::Reviewer]).await?;
    let evaluation = state
        .workflow
        .evaluate(
            &identity,
            EvaluateDocumentCommand {
                document_id: DocumentId(document_id),
                comment: req.comment,
                status: req.status,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

/// GET /documents/{id}/evaluations
pub async fn evaluations(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    ApiPath(document_id): ApiPath<i64>,
) -> Result<Json<Vec<EvaluationView>>, WorkflowError> {
    let identity = state.guard.authorize(&token, &Role::ALL).await?;
    let evaluations = state
        .workflow
        .queries()
        .visible_evaluations(&identity, DocumentId(document_id))
        .await?;
    Ok(Json(evaluations))
}
