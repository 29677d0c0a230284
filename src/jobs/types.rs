//! Job types for background prediction runs

use serde::{Deserialize, Serialize};

/// Job to compute the stress prediction for a user's current day.
///
/// Enqueued by the cron scheduler and, guarded by the recent-prediction
/// cooldown, after qualifying wellbeing/mood writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictStressJob {
    pub user_id: String,
    pub force_refresh: bool,
}
