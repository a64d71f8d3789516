//! 按访问范围过滤的查询

use std::collections::HashMap;
use std::sync::Arc;

use docreview_common::UserId;
use tracing::warn;

use super::dto::{DocumentView, EvaluationView};
use crate::application::access::RoleGate;
use crate::domain::{
    Document, DocumentFilter, DocumentId, DocumentRepository, Evaluation, EvaluationRepository,
    Identity, ReviewStage, Role, UserRepository,
};
use crate::error::{WorkflowError, WorkflowResult};

/// 单次调用内的邮箱缓存
struct EmailDirectory<'a> {
    users: &'a dyn UserRepository,
    cache: HashMap<UserId, Option<String>>,
}

impl<'a> EmailDirectory<'a> {
    fn new(users: &'a dyn UserRepository) -> Self {
        Self {
            users,
            cache: HashMap::new(),
        }
    }

    async fn email_of(&mut self, id: &UserId) -> WorkflowResult<Option<String>> {
        if let Some(email) = self.cache.get(id) {
            return Ok(email.clone());
        }

        let email = self
            .users
            .find_by_id(id)
            .await?
            .map(|user| user.email.to_string());
        self.cache.insert(id.clone(), email.clone());
        Ok(email)
    }
}

/// 访问范围查询
#[derive(Clone)]
pub struct AccessScopedQueries {
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
    evaluations: Arc<dyn EvaluationRepository>,
}

impl AccessScopedQueries {
    pub fn new(
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentRepository>,
        evaluations: Arc<dyn EvaluationRepository>,
    ) -> Self {
        Self {
            users,
            documents,
            evaluations,
        }
    }

    /// 当前身份可见的文档
    pub async fn visible_documents(&self, identity: &Identity) -> WorkflowResult<Vec<DocumentView>> {
        RoleGate::require_active(identity)?;

        let filter = match identity.role {
            Role::Administrator => DocumentFilter::All,
            Role::Submitter => DocumentFilter::OwnedBy(identity.id.clone()),
            Role::Reviewer => DocumentFilter::AssignedTo(identity.id.clone()),
        };

        let documents = self.documents.list(&filter).await?;
        let mut directory = EmailDirectory::new(self.users.as_ref());

        let mut views = Vec::with_capacity(documents.len());
        for document in documents {
            views.push(self.project(document, &mut directory).await?);
        }
        Ok(views)
    }

    /// 当前身份可见的某文档评审
    pub async fn visible_evaluations(
        &self,
        identity: &Identity,
        document_id: DocumentId,
    ) -> WorkflowResult<Vec<EvaluationView>> {
        RoleGate::require_active(identity)?;

        let document = self
            .documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Document {} not found", document_id)))?;

        let permitted = match identity.role {
            Role::Administrator => true,
            Role::Submitter => document.is_owned_by(&identity.id),
            Role::Reviewer => document.is_assigned_to(&identity.id),
        };
        if !permitted {
            warn!(
                user_id = %identity.id,
                document_id = %document_id,
                "Evaluations requested outside access scope"
            );
            return Err(WorkflowError::forbidden(
                "Document is outside your access scope",
            ));
        }

        let evaluations = self.evaluations.list_by_document(document_id).await?;
        let mut directory = EmailDirectory::new(self.users.as_ref());
        self.project_evaluations(evaluations, &mut directory).await
    }

    /// 读取单个文档投影（写入后回读）
    pub(crate) async fn document_view(&self, document_id: DocumentId) -> WorkflowResult<DocumentView> {
        let document = self
            .documents
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(format!("Document {} not found", document_id)))?;

        let mut directory = EmailDirectory::new(self.users.as_ref());
        self.project(document, &mut directory).await
    }

    pub(crate) async fn evaluation_view(&self, evaluation: Evaluation) -> WorkflowResult<EvaluationView> {
        let mut directory = EmailDirectory::new(self.users.as_ref());
        let mut views = self.project_evaluations(vec![evaluation], &mut directory).await?;
        views
            .pop()
            .ok_or_else(|| WorkflowError::not_found("Evaluation not found"))
    }

    async fn project(
        &self,
        document: Document,
        directory: &mut EmailDirectory<'_>,
    ) -> WorkflowResult<DocumentView> {
        let evaluations = self.evaluations.list_by_document(document.id).await?;
        let evaluations = self.project_evaluations(evaluations, directory).await?;

        let uploaded_by = directory.email_of(&document.owner_id).await?;
        let assigned_reviewer_email = match &document.assigned_reviewer_id {
            Some(reviewer_id) => directory.email_of(reviewer_id).await?,
            None => None,
        };

        Ok(DocumentView {
            id: document.id,
            stage: ReviewStage::derive(document.assigned_reviewer_id.is_some(), evaluations.len()),
            title: document.title,
            organization: document.organization,
            storage_key: document.content.storage_key().to_string(),
            url: document.content.url().to_string(),
            owner_id: document.owner_id,
            uploaded_by,
            assigned_reviewer_id: document.assigned_reviewer_id,
            assigned_reviewer_email,
            version: document.version,
            created_at: document.timestamps.created_at,
            evaluations,
        })
    }

    async fn project_evaluations(
        &self,
        evaluations: Vec<Evaluation>,
        directory: &mut EmailDirectory<'_>,
    ) -> WorkflowResult<Vec<EvaluationView>> {
        let mut views = Vec::with_capacity(evaluations.len());
        for evaluation in evaluations {
            let reviewer_email = directory.email_of(&evaluation.reviewer_id).await?;
            views.push(EvaluationView {
                id: evaluation.id,
                document_id: evaluation.document_id,
                reviewer_id: evaluation.reviewer_id,
                reviewer_email,
                comment: evaluation.comment,
                status: evaluation.status,
                created_at: evaluation.timestamps.created_at,
            });
        }
        Ok(views)
    }
}
