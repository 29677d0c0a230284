//! Postgres-backed record store.
//!
//! Records are stored as one JSON document per (user, day); the scoring
//! pipeline treats the store as a document collection, so the relational
//! surface stays minimal.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};
use tracing::warn;

use crate::config;
use crate::db::store::RecordStore;
use crate::models::record::DailyRecord;

type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub struct PostgresRecordStore {
    client: Arc<RwLock<Option<Client>>>,
}

impl PostgresRecordStore {
    pub async fn new() -> StoreResult<Self> {
        let database_url = config::get_database_url();

        let connect = || async { tokio_postgres::connect(&database_url, NoTls).await };
        let (client, connection) = connect
            .retry(ExponentialBuilder::default().with_max_times(5))
            .notify(|err, dur| {
                warn!(error = %err, retry_in = ?dur, "database connection failed, retrying");
            })
            .await
            .map_err(|e| {
                Box::new(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("Failed to connect to Postgres: {}", e),
                )) as Box<dyn std::error::Error + Send + Sync>
            })?;

        // Drive the connection on its own task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Postgres connection error");
            }
        });

        let store = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };
        store.init_schema().await?;

        Ok(store)
    }

    async fn init_schema(&self) -> StoreResult<()> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Err(no_client());
        };

        c.execute(
            "CREATE TABLE IF NOT EXISTS daily_records (
                user_id TEXT NOT NULL,
                date DATE NOT NULL,
                document TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (user_id, date)
            )",
            &[],
        )
        .await
        .map_err(|e| {
            Box::new(std::io::Error::other(format!(
                "Failed to create daily_records table: {}",
                e
            ))) as Box<dyn std::error::Error + Send + Sync>
        })?;

        Ok(())
    }
}

fn no_client() -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::NotConnected,
        "Postgres client not available",
    ))
}

fn decode(document: &str) -> StoreResult<DailyRecord> {
    serde_json::from_str(document).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Corrupt daily record document: {}", e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn find(&self, user_id: &str, date: NaiveDate) -> StoreResult<Option<DailyRecord>> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Err(no_client());
        };

        let row = c
            .query_opt(
                "SELECT document FROM daily_records WHERE user_id = $1 AND date = $2",
                &[&user_id, &date],
            )
            .await?;

        match row {
            Some(row) => {
                let document: String = row.get(0);
                Ok(Some(decode(&document)?))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, record: &DailyRecord) -> StoreResult<()> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Err(no_client());
        };

        let document = serde_json::to_string(record)?;
        c.execute(
            "INSERT INTO daily_records (user_id, date, document)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, date)
             DO UPDATE SET document = EXCLUDED.document, updated_at = now()",
            &[&record.user_id, &record.date, &document],
        )
        .await?;

        Ok(())
    }

    async fn history(
        &self,
        user_id: &str,
        since: NaiveDate,
        before: NaiveDate,
    ) -> StoreResult<Vec<DailyRecord>> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Err(no_client());
        };

        let rows = c
            .query(
                "SELECT document FROM daily_records
                 WHERE user_id = $1 AND date >= $2 AND date < $3
                 ORDER BY date DESC",
                &[&user_id, &since, &before],
            )
            .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let document: String = row.get(0);
            records.push(decode(&document)?);
        }
        Ok(records)
    }

    async fn recent_user_ids(&self, since: NaiveDate) -> StoreResult<Vec<String>> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Err(no_client());
        };

        let rows = c
            .query(
                "SELECT DISTINCT user_id FROM daily_records WHERE date >= $1 ORDER BY user_id",
                &[&since],
            )
            .await?;

        Ok(rows.iter().map(|row| row.get(0)).collect())
    }
}
