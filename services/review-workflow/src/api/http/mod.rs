//! HTTP 接口
//!
//! 所有受保护路由在 handler 内部通过 [`AccessGuard`] 完成身份与角色校验

mod error;
pub mod extract;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, patch, post};
use docreview_auth_core::TokenService;
use docreview_config::CorsConfig;
use docreview_ports::ObjectStorage;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::application::{AccessGuard, AccountService, DocumentWorkflow, IdentityResolver, WorkflowPolicy};
use crate::infrastructure::persistence::Repositories;
use handlers::{account, admin, documents, system};

/// 上传请求体上限（20 MiB）
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub guard: AccessGuard,
    pub accounts: AccountService,
    pub workflow: DocumentWorkflow,
    pub metrics: Option<PrometheusHandle>,
    pub db: Option<PgPool>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        storage: Arc<dyn ObjectStorage>,
        tokens: Arc<TokenService>,
        policy: WorkflowPolicy,
    ) -> Self {
        let guard = AccessGuard::new(IdentityResolver::new(tokens.clone(), repos.users.clone()));
        let accounts = AccountService::new(repos.users.clone(), tokens);
        let workflow = DocumentWorkflow::new(
            repos.users,
            repos.documents,
            repos.evaluations,
            storage,
            policy,
        );

        Self {
            guard,
            accounts,
            workflow,
            metrics: None,
            db: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// 提供连接池后 `/health` 会检查数据库
    pub fn with_database(mut self, pool: PgPool) -> Self {
        self.db = Some(pool);
        self
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            // tower-http 的来源列表不接受通配符
            if origin.trim() == "*" {
                warn!("Ignoring wildcard CORS origin");
                return None;
            }
            match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// 构建完整路由
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .route("/register", post(account::register))
        .route("/login", post(account::login))
        .route("/dashboard", get(account::dashboard))
        .route(
            "/submitter/documents",
            post(documents::upload).get(documents::list_submitted),
        )
        .route("/reviewer/documents", get(documents::list_assigned))
        .route(
            "/reviewer/documents/{id}/evaluate",
            post(documents::evaluate),
        )
        .route("/documents/{id}/evaluations", get(documents::evaluations))
        .route("/admin/documents", get(admin::list_documents))
        .route(
            "/admin/documents/{id}/assign-reviewer",
            post(admin::assign_reviewer),
        )
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}", patch(admin::update_user_access))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}
