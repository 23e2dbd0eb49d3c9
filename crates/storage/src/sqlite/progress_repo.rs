use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ProgressRecord, ProgressRepository, StorageError};

/// Key names for the two persisted fields.
const TOTAL_STEPS_KEY: &str = "total_steps";
const LOCATION_INDEX_KEY: &str = "current_location_index";

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

impl SqliteRepository {
    async fn read_key(&self, key: &'static str) -> Result<u32, StorageError> {
        let row = sqlx::query(
            r"
                SELECT value
                FROM journey_progress
                WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(conn)?;

        // Absent keys default to 0 (first run).
        match row {
            Some(row) => u32_from_i64(key, row.try_get::<i64, _>("value").map_err(conn)?),
            None => Ok(0),
        }
    }
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load(&self) -> Result<ProgressRecord, StorageError> {
        let total_steps = self.read_key(TOTAL_STEPS_KEY).await?;
        let waypoint_index = self.read_key(LOCATION_INDEX_KEY).await?;

        Ok(ProgressRecord {
            total_steps,
            waypoint_index,
        })
    }

    async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let mut tx = self.pool().begin().await.map_err(conn)?;

        for (key, value) in [
            (TOTAL_STEPS_KEY, i64::from(record.total_steps)),
            (LOCATION_INDEX_KEY, i64::from(record.waypoint_index)),
        ] {
            sqlx::query(
                r"
                    INSERT INTO journey_progress (key, value)
                    VALUES (?1, ?2)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value
                ",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)
    }
}
