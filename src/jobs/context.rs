//! Job context for dependency injection

use crate::core::orchestrator::PredictionOrchestrator;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Context passed to job handlers via the Apalis Data<T> pattern.
///
/// Jobs only drive the orchestrator; they never open their own
/// connections.
pub struct JobContext {
    pub orchestrator: Arc<PredictionOrchestrator>,
    pub metrics: Option<Arc<Metrics>>,
}

impl JobContext {
    pub fn new(orchestrator: Arc<PredictionOrchestrator>, metrics: Option<Arc<Metrics>>) -> Self {
        Self {
            orchestrator,
            metrics,
        }
    }
}
