//! 文档工作流引擎

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use docreview_config::WorkflowConfig;
use docreview_ports::ObjectStorage;
use metrics::{counter, histogram};
use tracing::{info, warn};

use super::commands::*;
use crate::application::access::RoleGate;
use crate::application::query::{AccessScopedQueries, DocumentView, EvaluationView};
use crate::domain::{
    ContentReference, DocumentRepository, EvaluationRepository, Identity, NewDocument,
    NewEvaluation, Role, UserRepository,
};
use crate::error::{WorkflowError, WorkflowResult};

/// 工作流策略
#[derive(Debug, Clone)]
pub struct WorkflowPolicy {
    /// 只有当前被指派的审稿人可以提交评审
    pub assignment_bound_evaluation: bool,
}

impl Default for WorkflowPolicy {
    fn default() -> Self {
        Self {
            assignment_bound_evaluation: true,
        }
    }
}

impl From<&WorkflowConfig> for WorkflowPolicy {
    fn from(config: &WorkflowConfig) -> Self {
        Self {
            assignment_bound_evaluation: config.assignment_bound_evaluation,
        }
    }
}

/// 记录操作次数与耗时
async fn instrumented<T>(
    operation: &'static str,
    fut: impl Future<Output = WorkflowResult<T>>,
) -> WorkflowResult<T> {
    let start = Instant::now();
    let result = fut.await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(e) => e.kind(),
    };
    counter!("workflow_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
    histogram!("workflow_operation_duration_ms", "operation" => operation)
        .record(start.elapsed().as_secs_f64() * 1000.0);

    result
}

/// 文档工作流
#[derive(Clone)]
pub struct DocumentWorkflow {
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
    evaluations: Arc<dyn EvaluationRepository>,
    storage: Arc<dyn ObjectStorage>,
    queries: AccessScopedQueries,
    policy: WorkflowPolicy,
}

impl DocumentWorkflow {
    pub fn new(
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentRepository>,
        evaluations: Arc<dyn EvaluationRepository>,
        storage: Arc<dyn ObjectStorage>,
        policy: WorkflowPolicy,
    ) -> Self {
        let queries =
            AccessScopedQueries::new(users.clone(), documents.clone(), evaluations.clone());
        Self {
            users,
            documents,
            evaluations,
            storage,
            queries,
            policy,
        }
    }

    pub fn queries(&self) -> &AccessScopedQueries {
        &self.queries
    }

    /// 提交文档（内容已在对象存储中）
    pub async fn submit(
        &self,
        identity: &Identity,
        cmd: SubmitDocumentCommand,
    ) -> WorkflowResult<DocumentView> {
        instrumented("submit", self.handle_submit(identity, cmd)).await
    }

    /// 上传文件并提交
    pub async fn upload_and_submit(
        &self,
        identity: &Identity,
        cmd: UploadDocumentCommand,
    ) -> WorkflowResult<DocumentView> {
        instrumented("upload_and_submit", self.handle_upload(identity, cmd)).await
    }

    /// 指派审稿人
    pub async fn assign_reviewer(
        &self,
        identity: &Identity,
        cmd: AssignReviewerCommand,
    ) -> WorkflowResult<DocumentView> {
        instrumented("assign_reviewer", self.handle_assign(identity, cmd)).await
    }

    /// 提交评审
    pub async fn evaluate(
        &self,
        identity: &Identity,
        cmd: EvaluateDocumentCommand,
    ) -> WorkflowResult<EvaluationView> {
        instrumented("evaluate", self.handle_evaluate(identity, cmd)).await
    }

    /// 当前身份可见的文档
    pub async fn list_visible_documents(
        &self,
        identity: &Identity,
    ) -> WorkflowResult<Vec<DocumentView>> {
        instrumented(
            "list_visible_documents",
            self.queries.visible_documents(identity),
        )
        .await
    }

    async fn handle_submit(
        &self,
        identity: &Identity,
        cmd: SubmitDocumentCommand,
    ) -> WorkflowResult<DocumentView> {
        RoleGate::require(identity, &[Role::Submitter])?;
        cmd.validate().map_err(WorkflowError::Validation)?;

        let content = ContentReference::new(cmd.storage_key, cmd.url)?;
        let document = self
            .documents
            .create(NewDocument {
                title: cmd.title.trim().to_string(),
                organization: cmd.organization.trim().to_string(),
                content,
                owner_id: identity.id.clone(),
            })
            .await?;

        info!(
            document_id = %document.id,
            owner_id = %identity.id,
            "Document submitted"
        );

        self.queries.document_view(document.id).await
    }

    async fn handle_upload(
        &self,
        identity: &Identity,
        cmd: UploadDocumentCommand,
    ) -> WorkflowResult<DocumentView> {
        // 校验通过后才上传
        RoleGate::require(identity, &[Role::Submitter])?;
        cmd.validate().map_err(WorkflowError::Validation)?;

        let size = cmd.bytes.len();
        let stored = self
            .storage
            .upload(cmd.bytes, &cmd.content_type, &cmd.file_name)
            .await?;

        info!(
            owner_id = %identity.id,
            storage_key = %stored.storage_key,
            size,
            "Document content uploaded"
        );

        let storage_key = stored.storage_key.clone();
        let result = self
            .handle_submit(
                identity,
                SubmitDocumentCommand {
                    title: cmd.title,
                    organization: cmd.organization,
                    storage_key: stored.storage_key,
                    url: stored.public_url,
                },
            )
            .await;

        if let Err(e) = &result {
            warn!(
                owner_id = %identity.id,
                storage_key = %storage_key,
                error = %e,
                "Uploaded object left without a document"
            );
        }
        result
    }

    async fn handle_assign(
        &self,
        identity: &Identity,
        cmd: AssignReviewerCommand,
    ) -> WorkflowResult<DocumentView> {
        RoleGate::require(identity, &[Role::Administrator])?;

        let document = self
            .documents
            .find_by_id(cmd.document_id)
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found(format!("Document {} not found", cmd.document_id))
            })?;

        let reviewer = self
            .users
            .find_by_id(&cmd.reviewer_id)
            .await?
            .filter(|user| user.has_role(Role::Reviewer))
            .ok_or_else(|| {
                WorkflowError::invalid_assignee(format!(
                    "User {} is not a reviewer",
                    cmd.reviewer_id
                ))
            })?;

        if !reviewer.is_active {
            warn!(
                document_id = %document.id,
                reviewer_id = %reviewer.id,
                "Assigning an inactive reviewer"
            );
        }

        let updated = self
            .documents
            .assign_reviewer(document.id, &reviewer.id, document.version)
            .await?;
        if !updated {
            warn!(
                document_id = %document.id,
                expected_version = document.version,
                "Concurrent reviewer assignment detected"
            );
            return Err(WorkflowError::conflict(format!(
                "Document {} was modified concurrently",
                document.id
            )));
        }

        info!(
            document_id = %document.id,
            reviewer_id = %reviewer.id,
            previous_reviewer_id = ?document.assigned_reviewer_id.as_ref().map(|id| id.to_string()),
            assigned_by = %identity.id,
            "Reviewer assigned"
        );

        self.queries.document_view(document.id).await
    }

    async fn handle_evaluate(
        &self,
        identity: &Identity,
        cmd: EvaluateDocumentCommand,
    ) -> WorkflowResult<EvaluationView> {
        RoleGate::require(identity, &[Role::Reviewer])?;
        cmd.validate().map_err(WorkflowError::Validation)?;

        let document = self
            .documents
            .find_by_id(cmd.document_id)
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found(format!("Document {} not found", cmd.document_id))
            })?;

        if self.policy.assignment_bound_evaluation && !document.is_assigned_to(&identity.id) {
            warn!(
                document_id = %document.id,
                reviewer_id = %identity.id,
                "Evaluation by a reviewer who is not assigned"
            );
            return Err(WorkflowError::forbidden(
                "Only the assigned reviewer may evaluate this document",
            ));
        }

        let evaluation = self
            .evaluations
            .create(NewEvaluation {
                document_id: document.id,
                reviewer_id: identity.id.clone(),
                comment: cmd.comment.trim().to_string(),
                status: cmd.status.trim().to_string(),
            })
            .await?;

        info!(
            evaluation_id = %evaluation.id,
            document_id = %document.id,
            reviewer_id = %identity.id,
            status = %evaluation.status,
            "Document evaluated"
        );

        self.queries.evaluation_view(evaluation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::domain::value_objects::{Email, HashedPassword};
    use crate::infrastructure::persistence::{
        InMemoryDocumentRepository, InMemoryEvaluationRepository, InMemoryUserRepository,
    };
    use crate::infrastructure::storage::InMemoryObjectStorage;

    struct Fixture {
        workflow: DocumentWorkflow,
        storage: Arc<InMemoryObjectStorage>,
        submitter: Identity,
        admin: Identity,
    }

    async fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let storage = Arc::new(InMemoryObjectStorage::new("https://cdn.example.org"));

        let mut identities = Vec::new();
        for (email, role) in [
            ("grantee@acme.org", Role::Submitter),
            ("admin@example.org", Role::Administrator),
        ] {
            let user = User::new(
                Email::new(email).unwrap(),
                HashedPassword::from_hash("$argon2id$fixture"),
                None,
                role,
            );
            users.create(&user).await.unwrap();
            identities.push(user.identity());
        }

        let workflow = DocumentWorkflow::new(
            users,
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(InMemoryEvaluationRepository::new()),
            storage.clone(),
            WorkflowPolicy::default(),
        );

        let admin = identities.pop().unwrap();
        let submitter = identities.pop().unwrap();
        Fixture {
            workflow,
            storage,
            submitter,
            admin,
        }
    }

    fn upload(bytes: &[u8]) -> UploadDocumentCommand {
        UploadDocumentCommand {
            title: " Grant Report ".to_string(),
            organization: "Acme NGO".to_string(),
            file_name: "report.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_upload_and_submit() {
        let f = fixture().await;
        let view = f
            .workflow
            .upload_and_submit(&f.submitter, upload(b"%PDF-1.7"))
            .await
            .unwrap();

        assert_eq!(view.title, "Grant Report");
        assert_eq!(view.uploaded_by.as_deref(), Some("grantee@acme.org"));
        assert!(view.storage_key.ends_with(".pdf"));
        assert!(view.url.starts_with("https://cdn.example.org/"));
        assert_eq!(f.storage.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_upload_rejected_before_storage() {
        let f = fixture().await;

        let err = f
            .workflow
            .upload_and_submit(&f.submitter, upload(b""))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        let err = f
            .workflow
            .upload_and_submit(&f.admin, upload(b"%PDF"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));

        assert_eq!(f.storage.object_count().await, 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_relative_url() {
        let f = fixture().await;
        let err = f
            .workflow
            .submit(
                &f.submitter,
                SubmitDocumentCommand {
                    title: "Grant Report".to_string(),
                    organization: "Acme NGO".to_string(),
                    storage_key: "k.pdf".to_string(),
                    url: "k.pdf".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = WorkflowPolicy::from(&WorkflowConfig {
            assignment_bound_evaluation: false,
        });
        assert!(!policy.assignment_bound_evaluation);
        assert!(WorkflowPolicy::default().assignment_bound_evaluation);
    }
}
