//! Alert creation rules over fresh persisted state.

use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::db::store::RecordStore;
use crate::metrics::Metrics;
use crate::models::prediction::{StressLevel, StressPrediction};
use crate::models::record::{Alert, AlertKind};

/// Decides whether a fresh prediction warrants a user-facing alert.
///
/// Always re-reads the latest persisted record before appending, so a
/// concurrent recompute cannot double-append from stale in-memory state.
/// Every failure here is logged and swallowed; the policy never fails the
/// prediction request.
pub struct AlertPolicy {
    store: Arc<dyn RecordStore>,
    config: ModelConfig,
    metrics: Option<Arc<Metrics>>,
}

impl AlertPolicy {
    pub fn new(
        store: Arc<dyn RecordStore>,
        config: ModelConfig,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            store,
            config,
            metrics,
        }
    }

    pub async fn evaluate(&self, user_id: &str, date: NaiveDate, prediction: &StressPrediction) {
        let alerts = match prediction.level {
            StressLevel::Critical => vec![Alert {
                kind: AlertKind::StressAlert,
                title: "Critical stress level".to_string(),
                message: "We detected very high stress levels. We recommend practicing a relaxation exercise.".to_string(),
                stress_level: Some(StressLevel::Critical),
                delivered_at: Utc::now(),
                acknowledged: false,
                acknowledged_at: None,
            }],
            StressLevel::High => self.persistent_high_alert(user_id, date).await,
            _ => Vec::new(),
        };

        if alerts.is_empty() {
            return;
        }

        self.append_alerts(user_id, date, alerts).await;
    }

    /// One alert when at least `persistent_high_min_days` of the recent
    /// look-back window were also high-tier days.
    async fn persistent_high_alert(&self, user_id: &str, date: NaiveDate) -> Vec<Alert> {
        let since = date - Duration::days(self.config.persistent_high_lookback_days);
        let prior = match self.store.history(user_id, since, date).await {
            Ok(records) => records,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "persistent-stress look-back failed, skipping alert");
                return Vec::new();
            }
        };

        let high_days = prior
            .iter()
            .take(self.config.persistent_high_fetch_limit)
            .filter(|record| {
                record
                    .stress_prediction
                    .as_ref()
                    .is_some_and(|p| p.level == StressLevel::High)
            })
            .count();

        if high_days >= self.config.persistent_high_min_days {
            vec![Alert {
                kind: AlertKind::StressAlert,
                title: "Persistent elevated stress".to_string(),
                message: "You have had several days of elevated stress. Consider adjusting your routine.".to_string(),
                stress_level: Some(StressLevel::High),
                delivered_at: Utc::now(),
                acknowledged: false,
                acknowledged_at: None,
            }]
        } else {
            Vec::new()
        }
    }

    async fn append_alerts(&self, user_id: &str, date: NaiveDate, alerts: Vec<Alert>) {
        // Re-read so the append lands on the latest persisted state.
        let mut fresh = match self.store.find(user_id, date).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(user_id = %user_id, "no persisted record for alerts, skipping");
                return;
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "could not reload record for alerts, skipping");
                return;
            }
        };

        let mut appended = 0;
        for alert in alerts {
            if fresh.alerts.len() >= self.config.max_alerts_per_record {
                debug!(user_id = %user_id, "alert cap reached, dropping alert");
                break;
            }
            fresh.alerts.push(alert);
            appended += 1;
        }

        if appended == 0 {
            return;
        }

        // No retry on conflict: a lost alert beats amplified write load.
        match self.store.upsert(&fresh).await {
            Ok(()) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.alerts_created_total.inc_by(appended);
                }
                info!(user_id = %user_id, count = appended, "created {} alerts for user {}", appended, user_id);
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "alert save conflict, skipping");
            }
        }
    }
}
