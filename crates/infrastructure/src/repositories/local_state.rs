use dashlet_domain::DomainError;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use tracing::warn;

/// Key/value access to the `local_state` table. Each value is one JSON blob.
#[derive(Clone)]
pub struct LocalStateTable {
    pool: SqlitePool,
}

impl LocalStateTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the stored blob, or `None` when the row is absent or its
    /// content is not valid JSON.
    pub async fn read(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let row = sqlx::query("SELECT value FROM local_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row.get("value");
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Stored state is corrupt, ignoring it");
                Ok(None)
            }
        }
    }

    pub async fn write(&self, key: &str, value: &Value) -> Result<(), DomainError> {
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        sqlx::query(
            "INSERT INTO local_state (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value.to_string())
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
