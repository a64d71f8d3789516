//! 集成测试共享夹具
#![allow(dead_code)]

use std::sync::Arc;

use docreview_auth_core::TokenService;
use docreview_config::CorsConfig;
use docreview_ports::ObjectStorage;
use review_workflow::application::workflow::UploadDocumentCommand;
use review_workflow::application::{AccountService, DocumentView, DocumentWorkflow, WorkflowPolicy};
use review_workflow::domain::value_objects::{Email, HashedPassword};
use review_workflow::domain::{DocumentId, Identity, Role, User, UserRepository};
use review_workflow::infrastructure::persistence::{
    InMemoryDocumentRepository, InMemoryEvaluationRepository, InMemoryUserRepository,
    Repositories,
};
use review_workflow::infrastructure::storage::InMemoryObjectStorage;
use review_workflow::{AppState, router};

pub const SECRET: &str = "integration-test-secret-key-0123456789";
pub const ISSUER: &str = "docreview";
pub const AUDIENCE: &str = "docreview-api";
pub const CDN: &str = "https://cdn.example.org";

/// 测试用户的占位哈希（不参与登录）
pub const FIXTURE_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$fixture$fixture";

pub struct TestApp {
    pub users: Arc<InMemoryUserRepository>,
    pub documents: Arc<InMemoryDocumentRepository>,
    pub evaluations: Arc<InMemoryEvaluationRepository>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub tokens: Arc<TokenService>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_policy(WorkflowPolicy::default())
    }

    pub fn with_policy(policy: WorkflowPolicy) -> Self {
        let storage = Arc::new(InMemoryObjectStorage::new(CDN));
        Self::build(policy, storage.clone(), storage)
    }

    /// 使用自定义对象存储（例如 mock）
    pub fn with_storage(storage: Arc<dyn ObjectStorage>) -> Self {
        Self::build(
            WorkflowPolicy::default(),
            Arc::new(InMemoryObjectStorage::new(CDN)),
            storage,
        )
    }

    fn build(
        policy: WorkflowPolicy,
        memory_storage: Arc<InMemoryObjectStorage>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let documents = Arc::new(InMemoryDocumentRepository::new());
        let evaluations = Arc::new(InMemoryEvaluationRepository::new());
        let tokens = Arc::new(TokenService::new(SECRET, 1800, ISSUER, AUDIENCE));

        let repos = Repositories {
            users: users.clone(),
            documents: documents.clone(),
            evaluations: evaluations.clone(),
        };
        let state = AppState::new(repos, storage, tokens.clone(), policy);

        Self {
            users,
            documents,
            evaluations,
            storage: memory_storage,
            tokens,
            state,
        }
    }

    pub fn workflow(&self) -> &DocumentWorkflow {
        &self.state.workflow
    }

    pub fn accounts(&self) -> &AccountService {
        &self.state.accounts
    }

    pub fn router(&self) -> axum::Router {
        router(self.state.clone(), &CorsConfig::default())
    }

    /// 直接写入一个用户，返回其身份
    pub async fn add_user(&self, email: &str, role: Role) -> Identity {
        let user = User::new(
            Email::new(email).unwrap(),
            HashedPassword::from_hash(FIXTURE_HASH),
            None,
            role,
        );
        self.users.create(&user).await.unwrap();
        user.identity()
    }

    /// 停用用户并返回最新身份
    pub async fn deactivate(&self, identity: &Identity) -> Identity {
        assert!(
            self.users
                .update_access(&identity.id, identity.role, false)
                .await
                .unwrap()
        );
        self.users
            .find_by_id(&identity.id)
            .await
            .unwrap()
            .unwrap()
            .identity()
    }

    pub fn token_for(&self, identity: &Identity) -> String {
        self.tokens
            .issue_access_token(&identity.id, identity.email.as_str(), identity.role.as_str())
            .unwrap()
            .token
    }

    pub async fn submit(&self, submitter: &Identity, title: &str) -> DocumentView {
        self.workflow()
            .upload_and_submit(submitter, upload_command(title, "Acme NGO"))
            .await
            .unwrap()
    }
}

pub fn upload_command(title: &str, organization: &str) -> UploadDocumentCommand {
    UploadDocumentCommand {
        title: title.to_string(),
        organization: organization.to_string(),
        file_name: "report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 test".to_vec(),
    }
}

pub fn ids(documents: &[DocumentView]) -> Vec<DocumentId> {
    let mut ids: Vec<_> = documents.iter().map(|d| d.id).collect();
    ids.sort();
    ids
}
