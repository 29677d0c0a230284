//! Apalis worker setup for prediction jobs

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::PredictStressJob;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use std::sync::Arc;
use tracing::info;

/// Configuration for the job runtime
#[derive(Clone)]
pub struct RuntimeConfig {
    pub concurrency: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { concurrency: 2 }
    }
}

/// Prediction runtime that sets up the Apalis worker
pub struct PredictionRuntime {
    config: RuntimeConfig,
    job_context: Arc<JobContext>,
    storage: Arc<RedisStorage<PredictStressJob>>,
}

impl PredictionRuntime {
    pub fn new(
        config: RuntimeConfig,
        job_context: Arc<JobContext>,
        storage: Arc<RedisStorage<PredictStressJob>>,
    ) -> Self {
        Self {
            config,
            job_context,
            storage,
        }
    }

    /// Start the worker and return handles for graceful shutdown
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = Vec::new();

        info!(
            concurrency = self.config.concurrency,
            "PredictionRuntime: starting Apalis worker with concurrency {}",
            self.config.concurrency
        );

        let storage = (*self.storage).clone();
        let job_context = self.job_context.clone();
        let handle = tokio::spawn(async move {
            let worker = WorkerBuilder::new("predict-stress-worker")
                .data(job_context.clone())
                .backend(storage)
                .build_fn(handlers::handle_predict_stress);

            info!("PredictionRuntime: PredictStressJob worker started");
            worker.run().await;
        });
        handles.push(handle);

        info!("PredictionRuntime: all workers started");
        Ok(handles)
    }
}
