//! PostgreSQL 评审 Repository 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docreview_adapter_postgres::map_sqlx_error;
use docreview_common::{Timestamps, UserId};
use docreview_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{DocumentId, Evaluation, EvaluationId, EvaluationRepository, NewEvaluation};

pub struct PostgresEvaluationRepository {
    pool: PgPool,
}

impl PostgresEvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvaluationRepository for PostgresEvaluationRepository {
    async fn create(&self, evaluation: NewEvaluation) -> AppResult<Evaluation> {
        let row = sqlx::query_as::<_, EvaluationRow>(
            r#"
            INSERT INTO evaluations (document_id, reviewer_id, comment, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, document_id, reviewer_id, comment, status, created_at, updated_at
            "#,
        )
        .bind(evaluation.document_id.0)
        .bind(evaluation.reviewer_id.0)
        .bind(&evaluation.comment)
        .bind(&evaluation.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_by_document(&self, document_id: DocumentId) -> AppResult<Vec<Evaluation>> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            r#"
            SELECT id, document_id, reviewer_id, comment, status, created_at, updated_at
            FROM evaluations
            WHERE document_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(document_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
struct EvaluationRow {
    id: i64,
    document_id: i64,
    reviewer_id: Uuid,
    comment: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<EvaluationRow> for Evaluation {
    fn from(row: EvaluationRow) -> Self {
        Evaluation {
            id: EvaluationId(row.id),
            document_id: DocumentId(row.document_id),
            reviewer_id: UserId::from_uuid(row.reviewer_id),
            comment: row.comment,
            status: row.status,
            timestamps: Timestamps {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}
