//! Job handlers for background prediction runs

use apalis::prelude::*;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::jobs::context::JobContext;
use crate::jobs::types::PredictStressJob;

/// Handler for the prediction job.
///
/// The orchestrator's outcome is total, so the job only fails on handler
/// wiring problems; degraded predictions complete normally and are
/// surfaced through the outcome's warning.
pub async fn handle_predict_stress(
    job: PredictStressJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let today = Utc::now().date_naive();
    debug!(
        user_id = %job.user_id,
        force_refresh = job.force_refresh,
        "PredictStressJob: computing prediction for {}",
        job.user_id
    );

    let outcome = ctx
        .orchestrator
        .compute_prediction(&job.user_id, today, job.force_refresh)
        .await;

    if let Some(ref warning) = outcome.warning {
        warn!(
            user_id = %job.user_id,
            warning = %warning,
            "PredictStressJob: degraded prediction for {}",
            job.user_id
        );
    } else {
        info!(
            user_id = %job.user_id,
            score = outcome.prediction.score,
            level = %outcome.prediction.level,
            "PredictStressJob: prediction stored for {}: {} ({})",
            job.user_id,
            outcome.prediction.score,
            outcome.prediction.level
        );
    }

    Ok(())
}
