//! Persistence for ingested records.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::ingest::IngestError;

/// One stored free-form payload.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: i64,
    pub raw_data: serde_json::Value,
    pub ingested_at: DateTime<Utc>,
}

pub struct RecordStore {
    pool: PgPool,
}

impl RecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a store over its own lazy pool, for callers that do not
    /// already hold one.
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), IngestError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS raw_records (
                id BIGSERIAL PRIMARY KEY,
                raw_data JSONB NOT NULL,
                ingested_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert(&self, payload: serde_json::Value) -> Result<StoredRecord, IngestError> {
        let record = sqlx::query_as::<_, StoredRecord>(
            "INSERT INTO raw_records (raw_data, ingested_at)
             VALUES ($1, $2)
             RETURNING id, raw_data, ingested_at",
        )
        .bind(payload)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    /// Most recent records first, bounded to keep the listing cheap.
    pub async fn list(&self) -> Result<Vec<StoredRecord>, IngestError> {
        let records = sqlx::query_as::<_, StoredRecord>(
            "SELECT id, raw_data, ingested_at
             FROM raw_records
             ORDER BY id DESC
             LIMIT 100",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
