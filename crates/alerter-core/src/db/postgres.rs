//! PostgreSQL connection and queries

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::models::MissRecord;

use super::MissStore;

/// PostgreSQL connection pool
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Create a new PostgreSQL connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(connect_options(config))
            .await?;

        Ok(Self { pool })
    }

    /// Health check
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every connection in the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
}

/// Repository over the `miss_infos` table
#[derive(Clone)]
pub struct MissRepository {
    pool: PgPool,
}

impl MissRepository {
    /// Create a new miss repository
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool.clone(),
        }
    }
}

#[async_trait]
impl MissStore for MissRepository {
    async fn unacknowledged(&self, address: &str) -> Result<Vec<MissRecord>> {
        let rows = sqlx::query_as::<_, MissRecord>(
            r#"
            SELECT id, address, height, time, alerted
            FROM miss_infos
            WHERE alerted = FALSE AND address = $1
            ORDER BY height ASC
            "#,
        )
        .bind(address)
        .fetch_all(&self.pool)
        .await?;

        debug!(address, count = rows.len(), "Fetched pending misses");
        Ok(rows)
    }

    async fn acknowledge(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE miss_infos SET alerted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("Miss", id.to_string()));
        }

        Ok(())
    }
}
