//! Cron-based scheduler for enqueuing prediction jobs

use crate::db::store::RecordStore;
use crate::jobs::types::PredictStressJob;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// How far back a user's last record may be for scheduled runs to still
/// cover them.
const ACTIVE_USER_WINDOW_DAYS: i64 = 14;

/// Scheduler that periodically enqueues PredictStressJob for every user
/// with recent records. Scheduled runs never force a refresh, so the
/// staleness window still bounds recomputation.
pub struct PredictionScheduler {
    storage: Arc<RedisStorage<PredictStressJob>>,
    store: Arc<dyn RecordStore>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl PredictionScheduler {
    /// # Arguments
    /// * `storage` - Redis storage backend for jobs
    /// * `store` - record store used to discover active users
    /// * `cron_expr` - seconds-resolution cron expression
    pub fn new(
        storage: Arc<RedisStorage<PredictStressJob>>,
        store: Arc<dyn RecordStore>,
        cron_expr: &str,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", cron_expr, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        info!(cron = %cron_expr, "PredictionScheduler: created with schedule {}", cron_expr);

        Ok(Self {
            storage,
            store,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let storage = self.storage.clone();
        let store = self.store.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("PredictionScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                let since =
                    chrono::Utc::now().date_naive() - chrono::Duration::days(ACTIVE_USER_WINDOW_DAYS);
                let users = match store.recent_user_ids(since).await {
                    Ok(users) => users,
                    Err(e) => {
                        warn!(error = %e, "PredictionScheduler: could not list active users, skipping tick");
                        continue;
                    }
                };

                info!(
                    user_count = users.len(),
                    "PredictionScheduler: cron tick, enqueuing PredictStressJob for {} users",
                    users.len()
                );

                for user_id in &users {
                    let job = PredictStressJob {
                        user_id: user_id.clone(),
                        force_refresh: false,
                    };

                    let mut storage_clone = (*storage).clone();
                    match storage_clone.push(job).await {
                        Ok(_) => {
                            debug!(user_id = %user_id, "PredictionScheduler: enqueued PredictStressJob for {}", user_id);
                        }
                        Err(e) => {
                            error!(
                                user_id = %user_id,
                                error = %e,
                                "PredictionScheduler: failed to enqueue PredictStressJob for {}",
                                user_id
                            );
                        }
                    }
                }
            }
        });

        {
            let mut h = handle_arc.write().await;
            *h = Some(handle);
        }

        info!("PredictionScheduler: started successfully");
        Ok(())
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("PredictionScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
