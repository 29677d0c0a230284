//! Harmonia Worker
//!
//! Processes stress prediction jobs from the Redis queue and runs the
//! scheduled prediction cron. Can be run as a separate process/instance
//! from the web server.

use apalis_redis::RedisStorage;
use dotenvy::dotenv;
use harmonia::config::{self, ModelConfig};
use harmonia::core::orchestrator::PredictionOrchestrator;
use harmonia::core::runtime::{PredictionRuntime, RuntimeConfig};
use harmonia::core::scheduler::PredictionScheduler;
use harmonia::db::store::RecordStore;
use harmonia::db::PostgresRecordStore;
use harmonia::jobs::context::JobContext;
use harmonia::logging;
use harmonia::metrics::Metrics;
use harmonia::recommendations::RuleBasedRecommender;
use harmonia::services::catalog::HttpExerciseCatalog;
use harmonia::stress::model::WeightedStressModel;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let env = config::get_environment();
    info!("Starting Harmonia Worker");
    info!(environment = %env, "Environment");

    // Initialize metrics
    let metrics = Arc::new(Metrics::new()?);

    // The worker cannot run without the record store
    info!("Initializing Postgres connection...");
    let store: Arc<dyn RecordStore> = match PostgresRecordStore::new().await {
        Ok(store) => {
            info!("Postgres connected");
            metrics.database_connected.set(1.0);
            Arc::new(store)
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Postgres");
            warn!("Worker requires the record store - exiting");
            return Err(format!("Postgres connection required for worker: {}", e).into());
        }
    };

    let model_config = ModelConfig::default();
    let catalog = Arc::new(HttpExerciseCatalog::new(config::get_exercises_service_url()));
    let orchestrator = Arc::new(PredictionOrchestrator::new(
        store.clone(),
        Arc::new(WeightedStressModel::new(model_config.clone())),
        Arc::new(RuleBasedRecommender::new(catalog, model_config.clone())),
        model_config,
        Some(metrics.clone()),
    ));

    info!("Connecting to Redis job queue...");
    let conn = apalis_redis::connect(config::get_redis_url())
        .await
        .map_err(|e| format!("Redis connection required for worker: {}", e))?;
    let storage = Arc::new(RedisStorage::new(conn));

    let job_context = Arc::new(JobContext::new(orchestrator, Some(metrics.clone())));

    let concurrency: usize = env::var("WORKER_CONCURRENCY")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(2);
    let runtime = PredictionRuntime::new(
        RuntimeConfig { concurrency },
        job_context,
        storage.clone(),
    );
    let handles = runtime.start_workers().await?;

    let scheduler =
        PredictionScheduler::new(storage, store, &config::get_prediction_cron())?;
    scheduler.start().await?;

    info!("Worker started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            scheduler.stop().await;
            for handle in handles {
                handle.abort();
            }
            info!("Worker stopped");
        }
    }

    Ok(())
}
