//! PostgreSQL snapshot repository.
//!
//! One row per symbol in the `currency` table, keyed by `currency_name`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::rate_aggregation::{
    Snapshot, SnapshotParts, SnapshotRepository, StoreError, StoreOperation,
};
use crate::domain::shared::{SnapshotId, Symbol, Timestamp};

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS currency (
        id               UUID PRIMARY KEY,
        currency_name    TEXT NOT NULL UNIQUE,
        price            DOUBLE PRECISION NOT NULL,
        price_min        DOUBLE PRECISION NOT NULL,
        price_max        DOUBLE PRECISION NOT NULL,
        changes_per_hour DOUBLE PRECISION NOT NULL DEFAULT 0,
        last_update      TIMESTAMPTZ NOT NULL
    )
";

const SELECT_ALL: &str = r"
    SELECT id, currency_name, price, price_min, price_max, changes_per_hour, last_update
    FROM currency
";

const SELECT_ONE: &str = r"
    SELECT id, currency_name, price, price_min, price_max, changes_per_hour, last_update
    FROM currency
    WHERE currency_name = $1
";

// The row id is assigned on first insert and never overwritten.
const UPSERT: &str = r"
    INSERT INTO currency (
        id, currency_name, price, price_min, price_max, changes_per_hour, last_update
    ) VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (currency_name) DO UPDATE SET
        price = EXCLUDED.price,
        price_min = EXCLUDED.price_min,
        price_max = EXCLUDED.price_max,
        changes_per_hour = EXCLUDED.changes_per_hour,
        last_update = EXCLUDED.last_update
";

/// PostgreSQL implementation of `SnapshotRepository`.
#[derive(Debug, Clone)]
pub struct PostgresSnapshotRepository {
    pool: PgPool,
}

impl PostgresSnapshotRepository {
    /// Connect a pool to `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be connected.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::persist(StoreOperation::Connect, None, e.to_string()))?;

        info!(
            max_connections = max_connections,
            "PostgreSQL connection pool initialized"
        );

        Ok(Self { pool })
    }

    /// Create the `currency` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::persist(StoreOperation::EnsureSchema, None, e.to_string()))?;
        debug!("Schema verified");
        Ok(())
    }

    fn row_to_snapshot(row: &PgRow, operation: StoreOperation) -> Result<Snapshot, StoreError> {
        let field = |name: &str, e: sqlx::Error| {
            StoreError::persist(operation, None, format!("column {name}: {e}"))
        };

        let name: String = row
            .try_get("currency_name")
            .map_err(|e| field("currency_name", e))?;
        let symbol = Symbol::new(name);
        let last_update: DateTime<Utc> = row
            .try_get("last_update")
            .map_err(|e| field("last_update", e))?;

        let parts = SnapshotParts {
            id: SnapshotId::new(row.try_get::<Uuid, _>("id").map_err(|e| field("id", e))?),
            name: symbol.clone(),
            price: row.try_get("price").map_err(|e| field("price", e))?,
            min_price: row.try_get("price_min").map_err(|e| field("price_min", e))?,
            max_price: row.try_get("price_max").map_err(|e| field("price_max", e))?,
            change_per_hour: row
                .try_get("changes_per_hour")
                .map_err(|e| field("changes_per_hour", e))?,
            last_update: Timestamp::new(last_update),
        };

        Snapshot::reconstitute(parts)
            .map_err(|e| StoreError::persist(operation, Some(&symbol), e.to_string()))
    }
}

#[async_trait]
impl SnapshotRepository for PostgresSnapshotRepository {
    async fn read_all(&self) -> Result<Vec<Snapshot>, StoreError> {
        let rows = sqlx::query(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::persist(StoreOperation::ReadAll, None, e.to_string()))?;

        rows.iter()
            .map(|row| Self::row_to_snapshot(row, StoreOperation::ReadAll))
            .collect()
    }

    async fn read(&self, symbol: &Symbol) -> Result<Snapshot, StoreError> {
        let row = sqlx::query(SELECT_ONE)
            .bind(symbol.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::persist(StoreOperation::Read, Some(symbol), e.to_string()))?
            .ok_or_else(|| StoreError::NotFound {
                symbol: symbol.clone(),
            })?;

        Self::row_to_snapshot(&row, StoreOperation::Read)
    }

    async fn upsert_many(&self, snapshots: &[Snapshot]) -> Result<(), StoreError> {
        let op = StoreOperation::UpsertMany;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::persist(op, None, e.to_string()))?;

        for snapshot in snapshots {
            sqlx::query(UPSERT)
                .bind(snapshot.id().as_uuid())
                .bind(snapshot.name().as_str())
                .bind(snapshot.price())
                .bind(snapshot.min_price())
                .bind(snapshot.max_price())
                .bind(snapshot.change_per_hour())
                .bind(snapshot.last_update().as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(|e| StoreError::persist(op, Some(snapshot.name()), e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::persist(op, None, e.to_string()))?;

        debug!(count = snapshots.len(), "Snapshots upserted");
        Ok(())
    }

    async fn read_change_per_hour(&self, symbol: &Symbol) -> Result<f64, StoreError> {
        let op = StoreOperation::ReadChangePerHour;
        let row = sqlx::query("SELECT changes_per_hour FROM currency WHERE currency_name = $1")
            .bind(symbol.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::persist(op, Some(symbol), e.to_string()))?
            .ok_or_else(|| StoreError::NotFound {
                symbol: symbol.clone(),
            })?;

        row.try_get("changes_per_hour")
            .map_err(|e| StoreError::persist(op, Some(symbol), e.to_string()))
    }
}
