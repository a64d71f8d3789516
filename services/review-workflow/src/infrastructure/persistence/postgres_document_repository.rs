//! PostgreSQL 文档 Repository 实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docreview_adapter_postgres::map_sqlx_error;
use docreview_common::{Timestamps, UserId};
use docreview_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    ContentReference, Document, DocumentFilter, DocumentId, DocumentRepository, NewDocument,
};

const DOCUMENT_COLUMNS: &str = "id, title, organization, storage_key, url, owner_id, \
     assigned_reviewer_id, version, created_at, updated_at";

pub struct PostgresDocumentRepository {
    pool: PgPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn create(&self, document: NewDocument) -> AppResult<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            r#"
            INSERT INTO documents (title, organization, storage_key, url, owner_id, version)
            VALUES ($1, $2, $3, $4, $5, 1)
            RETURNING {}
            "#,
            DOCUMENT_COLUMNS
        ))
        .bind(&document.title)
        .bind(&document.organization)
        .bind(document.content.storage_key())
        .bind(document.content.url())
        .bind(document.owner_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: DocumentId) -> AppResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {} FROM documents WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, filter: &DocumentFilter) -> AppResult<Vec<Document>> {
        let (condition, user_id) = match filter {
            DocumentFilter::All => ("", None),
            DocumentFilter::OwnedBy(owner) => ("WHERE owner_id = $1", Some(owner.0)),
            DocumentFilter::AssignedTo(reviewer) => {
                ("WHERE assigned_reviewer_id = $1", Some(reviewer.0))
            }
        };
        let sql = format!(
            "SELECT {} FROM documents {} ORDER BY id ASC",
            DOCUMENT_COLUMNS, condition
        );

        let mut query = sqlx::query_as::<_, DocumentRow>(&sql);
        if let Some(user_id) = user_id {
            query = query.bind(user_id);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn assign_reviewer(
        &self,
        id: DocumentId,
        reviewer_id: &UserId,
        expected_version: i64,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET assigned_reviewer_id = $2, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $3
            "#,
        )
        .bind(id.0)
        .bind(reviewer_id.0)
        .bind(expected_version)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: i64,
    title: String,
    organization: String,
    storage_key: String,
    url: String,
    owner_id: Uuid,
    assigned_reviewer_id: Option<Uuid>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: DocumentId(row.id),
            title: row.title,
            organization: row.organization,
            content: ContentReference::from_stored(row.storage_key, row.url),
            owner_id: UserId::from_uuid(row.owner_id),
            assigned_reviewer_id: row.assigned_reviewer_id.map(UserId::from_uuid),
            version: row.version,
            timestamps: Timestamps {
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}
