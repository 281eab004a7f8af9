//! Document persistence: JSON documents grouped into named collections.
//!
//! Default: `PgDocumentStore`, a single JSONB table keyed by `(collection, id)`.
//! `AppState` holds an `Arc<dyn DocumentStore>`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::DocumentRow;

pub const RESUMES_COLLECTION: &str = "resumes";
pub const PROFILES_COLLECTION: &str = "profiles";
pub const COLLECTIONS: &[&str] = &[RESUMES_COLLECTION, PROFILES_COLLECTION];

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts or replaces the document and returns its id.
    async fn save(&self, collection: &str, id: &str, data: &Value) -> Result<String, AppError>;
    async fn get(&self, collection: &str, id: &str) -> Result<Option<DocumentRow>, AppError>;
    /// Newest first.
    async fn list(&self, collection: &str) -> Result<Vec<DocumentRow>, AppError>;
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn save(&self, collection: &str, id: &str, data: &Value) -> Result<String, AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (collection, id)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        debug!("Saved document {collection}/{id}");
        Ok(id.to_string())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<DocumentRow>, AppError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT collection, id, data, created_at, updated_at FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, collection: &str) -> Result<Vec<DocumentRow>, AppError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT collection, id, data, created_at, updated_at FROM documents WHERE collection = $1 ORDER BY created_at DESC",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::memory::MemoryDocumentStore;
    use super::*;

    #[tokio::test]
    async fn test_memory_store_upsert_and_list() {
        let store = MemoryDocumentStore::default();
        store
            .save(RESUMES_COLLECTION, "cv_1", &json!({"filename": "cv.pdf"}))
            .await
            .unwrap();
        store
            .save(RESUMES_COLLECTION, "cv_1", &json!({"filename": "cv2.pdf"}))
            .await
            .unwrap();
        store
            .save(PROFILES_COLLECTION, "p_1", &json!({}))
            .await
            .unwrap();

        let resumes = store.list(RESUMES_COLLECTION).await.unwrap();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].data["filename"], "cv2.pdf");

        let got = store.get(PROFILES_COLLECTION, "p_1").await.unwrap();
        assert!(got.is_some());
        assert!(store.get(PROFILES_COLLECTION, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MemoryDocumentStore::failing();
        assert!(store.save(RESUMES_COLLECTION, "x", &json!({})).await.is_err());
    }
}
