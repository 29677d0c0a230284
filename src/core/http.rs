//! HTTP endpoint server using Axum

use apalis::prelude::Storage;
use axum::{
    extract::{FromRequestParts, Path, Query, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{Json, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, error, info, warn, Level};

use crate::config::{self, ModelConfig};
use crate::core::orchestrator::{PredictionOrchestrator, PredictionOutcome};
use crate::db::store::RecordStore;
use crate::db::PostgresRecordStore;
use crate::jobs::types::PredictStressJob;
use crate::metrics::Metrics;
use crate::models::record::{ExerciseSession, MoodEntry, WellbeingSnapshot, WellbeingSource};
use crate::recommendations::RuleBasedRecommender;
use crate::services::catalog::HttpExerciseCatalog;
use crate::stress::model::WeightedStressModel;
use crate::stress::stats;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub store: Option<Arc<dyn RecordStore>>,
    pub orchestrator: Option<Arc<PredictionOrchestrator>>,
    pub trigger_queue: Option<apalis_redis::RedisStorage<PredictStressJob>>,
    pub config: ModelConfig,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Authenticated caller identity, taken from the `x-user-id` header the
/// gateway injects. Request validation beyond presence is the gateway's
/// concern.
pub struct UserId(pub String);

impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "User ID required" })),
            ))
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "harmonia-daily-service"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

fn store_of(state: &AppState) -> Result<&Arc<dyn RecordStore>, StatusCode> {
    state.store.as_ref().ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

/// Enqueue a background re-prediction after a qualifying write, unless a
/// recent prediction makes it pointless. Fire-and-forget: the write path
/// never waits on the queue.
fn maybe_enqueue_prediction(state: &AppState, user_id: &str) {
    let Some(queue) = state.trigger_queue.clone() else {
        return;
    };
    let Some(store) = state.store.clone() else {
        return;
    };
    let cooldown = state.config.trigger_cooldown();
    let user_id = user_id.to_string();

    tokio::spawn(async move {
        let today = Utc::now().date_naive();

        // Staleness precondition: a fresh prediction means nothing to do.
        match store.find(&user_id, today).await {
            Ok(Some(record)) => {
                if let Some(prediction) = record.stress_prediction {
                    if prediction.age(Utc::now()) < cooldown {
                        debug!(user_id = %user_id, "skipping auto-prediction, recent prediction exists");
                        return;
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "auto-prediction precondition check failed");
                return;
            }
        }

        let job = PredictStressJob {
            user_id: user_id.clone(),
            force_refresh: true,
        };
        let mut queue = queue;
        if let Err(e) = queue.push(job).await {
            warn!(user_id = %user_id, error = %e, "failed to enqueue auto-prediction");
        } else {
            debug!(user_id = %user_id, "enqueued auto-prediction after write");
        }
    });
}

// ---------------------------------------------------------------------------
// Stress prediction routes

#[derive(Debug, Default, Deserialize)]
struct PredictRequest {
    #[serde(default)]
    force_refresh: bool,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    message: &'static str,
    #[serde(flatten)]
    outcome: PredictionOutcome,
}

/// Generate (or return the cached) stress prediction for today. Always
/// answers 200 with a valid prediction; degradation is signaled through
/// the warning field.
async fn predict_stress(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    request: Option<Json<PredictRequest>>,
) -> Result<Json<PredictResponse>, StatusCode> {
    let orchestrator = state
        .orchestrator
        .as_ref()
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)?;

    let force_refresh = request.map(|Json(r)| r.force_refresh).unwrap_or(false);
    let today = Utc::now().date_naive();
    let outcome = orchestrator
        .compute_prediction(&user_id, today, force_refresh)
        .await;

    let message = if outcome.warning.is_some() {
        "Prediction generated with limitations"
    } else {
        "Stress prediction generated successfully"
    };

    Ok(Json(PredictResponse { message, outcome }))
}

/// Get today's stress prediction
async fn stress_today(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let record = store
        .find(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    match record.and_then(|r| r.stress_prediction.map(|p| (p, r.recommendations))) {
        Some((prediction, recommendations)) => Ok(Json(json!({
            "prediction": prediction,
            "recommendations": recommendations,
        }))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    days: Option<i64>,
}

/// Get stress history with summary statistics
async fn stress_history(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let today = Utc::now().date_naive();
    let days = params.days.unwrap_or(30).clamp(1, 365);

    let records = store
        .history(&user_id, today - Duration::days(days), today + Duration::days(1))
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load stress history");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let history: Vec<Value> = records
        .iter()
        .filter_map(|record| {
            record.stress_prediction.as_ref().map(|prediction| {
                json!({
                    "date": record.date,
                    "stress_score": prediction.score,
                    "stress_level": prediction.level,
                    "sleep_hours": record.wellbeing.as_ref().and_then(|w| w.sleep_hours),
                    "steps": record.wellbeing.as_ref().and_then(|w| w.steps),
                })
            })
        })
        .collect();

    let stats = stats::stress_stats(&records);
    Ok(Json(json!({ "history": history, "stats": stats })))
}

// ---------------------------------------------------------------------------
// Recommendation routes

/// Get active (not yet completed) recommendations
async fn recommendations_active(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let record = store
        .find(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let mut active: Vec<_> = record
        .map(|r| r.recommendations)
        .unwrap_or_default()
        .into_iter()
        .filter(|r| !r.completed)
        .collect();
    active.sort_by(|a, b| b.priority.cmp(&a.priority));

    Ok(Json(json!({ "recommendations": active })))
}

/// Mark a recommendation as completed
async fn complete_recommendation(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(index): Path<usize>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let today = Utc::now().date_naive();
    let mut record = store
        .find(&user_id, today)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let recommendation = record
        .recommendations
        .get_mut(index)
        .ok_or(StatusCode::NOT_FOUND)?;
    recommendation.completed = true;
    recommendation.completed_at = Some(Utc::now());
    let completed = recommendation.clone();

    store.upsert(&record).await.map_err(|e| {
        error!(error = %e, "Failed to save recommendation completion");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!({
        "message": "Recommendation marked as completed",
        "recommendation": completed,
    })))
}

// ---------------------------------------------------------------------------
// Alert routes

/// Get active (unacknowledged) alerts
async fn alerts_active(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let record = store
        .find(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let mut active: Vec<_> = record
        .map(|r| r.alerts)
        .unwrap_or_default()
        .into_iter()
        .filter(|a| !a.acknowledged)
        .collect();
    active.sort_by(|a, b| b.delivered_at.cmp(&a.delivered_at));

    Ok(Json(json!({ "alerts": active })))
}

/// Acknowledge an alert
async fn acknowledge_alert(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Path(index): Path<usize>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let today = Utc::now().date_naive();
    let mut record = store
        .find(&user_id, today)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let alert = record.alerts.get_mut(index).ok_or(StatusCode::NOT_FOUND)?;
    alert.acknowledged = true;
    alert.acknowledged_at = Some(Utc::now());
    let acknowledged = alert.clone();

    store.upsert(&record).await.map_err(|e| {
        error!(error = %e, "Failed to save alert acknowledgement");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(json!({
        "message": "Alert acknowledged successfully",
        "alert": acknowledged,
    })))
}

// ---------------------------------------------------------------------------
// Wellbeing routes

#[derive(Debug, Deserialize)]
struct SyncWellbeingRequest {
    sleep_hours: Option<f64>,
    steps: Option<u32>,
    source: Option<WellbeingSource>,
    date: Option<NaiveDate>,
    #[serde(default)]
    skip_auto_prediction: bool,
}

/// Sync wellbeing data from an ingestion collaborator. Incoming values
/// merge over what the day already has; a guarded re-prediction is
/// enqueued unless the caller opts out.
async fn sync_wellbeing(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<SyncWellbeingRequest>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let store = store_of(&state)?;
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    info!(
        user_id = %user_id,
        sleep_hours = ?request.sleep_hours,
        steps = ?request.steps,
        "received wellbeing sync"
    );

    let mut record = store.find_or_create(&user_id, date).await.map_err(|e| {
        error!(error = %e, "Failed to load daily record");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let existing = record.wellbeing.take();
    record.wellbeing = Some(WellbeingSnapshot {
        sleep_hours: request
            .sleep_hours
            .or(existing.as_ref().and_then(|w| w.sleep_hours)),
        steps: request.steps.or(existing.as_ref().and_then(|w| w.steps)),
        source: request.source.unwrap_or(WellbeingSource::GoogleFit),
        last_sync_at: Some(Utc::now()),
    });

    store.upsert(&record).await.map_err(|e| {
        error!(error = %e, "Failed to save wellbeing sync");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if !request.skip_auto_prediction {
        maybe_enqueue_prediction(&state, &user_id);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Wellbeing data synced successfully",
            "record": {
                "date": record.date,
                "wellbeing": record.wellbeing,
            }
        })),
    ))
}

#[derive(Debug, Deserialize)]
struct ManualWellbeingRequest {
    sleep_hours: Option<f64>,
    steps: Option<u32>,
    source: Option<WellbeingSource>,
}

/// Manual wellbeing data entry
async fn save_wellbeing(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<ManualWellbeingRequest>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let store = store_of(&state)?;
    let mut record = store
        .find_or_create(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    record.wellbeing = Some(WellbeingSnapshot {
        sleep_hours: request.sleep_hours,
        steps: request.steps,
        source: request.source.unwrap_or(WellbeingSource::Manual),
        last_sync_at: None,
    });

    store.upsert(&record).await.map_err(|e| {
        error!(error = %e, "Failed to save wellbeing data");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Wellbeing data saved successfully",
            "record": record,
        })),
    ))
}

/// Get today's wellbeing data
async fn wellbeing_today(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let record = store
        .find(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let wellbeing = record.and_then(|r| r.wellbeing);
    let has_data = wellbeing.as_ref().map_or(false, WellbeingSnapshot::has_data);
    Ok(Json(json!({ "wellbeing": wellbeing, "has_data": has_data })))
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

const RANGE_QUERY_LIMIT: usize = 30;

/// Get wellbeing records over a date range
async fn wellbeing_range(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let today = Utc::now().date_naive();
    let since = params.from.unwrap_or(today - Duration::days(30));
    let before = params.to.map_or(today + Duration::days(1), |to| to + Duration::days(1));

    let mut records = store.history(&user_id, since, before).await.map_err(|e| {
        error!(error = %e, "Failed to load wellbeing records");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    records.truncate(RANGE_QUERY_LIMIT);

    Ok(Json(json!({ "records": records })))
}

// ---------------------------------------------------------------------------
// Mood and session routes

#[derive(Debug, Deserialize)]
struct AddMoodRequest {
    mood_score: u16,
    note: Option<String>,
}

/// Add a mood entry to today's record and trigger a guarded re-prediction
async fn add_mood(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<AddMoodRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if request.mood_score > 100 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "mood_score must be between 0 and 100" })),
        ));
    }

    let store = state.store.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "message": "Record store unavailable" })),
    ))?;

    let mut record = store
        .find_or_create(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Server error" })),
            )
        })?;

    let entry = MoodEntry {
        mood_score: request.mood_score as u8,
        note: request.note,
        recorded_at: Utc::now(),
    };
    record.mood_entries.push(entry.clone());

    store.upsert(&record).await.map_err(|e| {
        error!(error = %e, "Failed to save mood entry");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Server error" })),
        )
    })?;

    maybe_enqueue_prediction(&state, &user_id);

    Ok(Json(json!({
        "message": "Mood entry added successfully",
        "mood_entry": entry,
    })))
}

#[derive(Debug, Deserialize)]
struct RecordSessionRequest {
    exercise_id: String,
    started_at: Option<chrono::DateTime<Utc>>,
    completed_at: Option<chrono::DateTime<Utc>>,
}

/// Record an exercise session
async fn record_session(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Json(request): Json<RecordSessionRequest>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let store = store_of(&state)?;
    let mut record = store
        .find_or_create(&user_id, Utc::now().date_naive())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load daily record");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    record.sessions.push(ExerciseSession {
        exercise_id: request.exercise_id,
        started_at: request.started_at.unwrap_or_else(Utc::now),
        completed_at: request.completed_at,
    });

    store.upsert(&record).await.map_err(|e| {
        error!(error = %e, "Failed to save exercise session");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Exercise session recorded successfully",
            "record": record,
        })),
    ))
}

/// Get exercise sessions over a date range
async fn list_sessions(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let today = Utc::now().date_naive();
    let since = params.from.unwrap_or(today - Duration::days(30));
    let before = params.to.map_or(today + Duration::days(1), |to| to + Duration::days(1));

    let mut records = store.history(&user_id, since, before).await.map_err(|e| {
        error!(error = %e, "Failed to load exercise sessions");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    records.truncate(RANGE_QUERY_LIMIT);

    let sessions: Vec<Value> = records
        .iter()
        .flat_map(|record| {
            record.sessions.iter().map(|session| {
                json!({
                    "exercise_id": session.exercise_id,
                    "started_at": session.started_at,
                    "completed_at": session.completed_at,
                    "date": record.date,
                })
            })
        })
        .collect();

    Ok(Json(json!({ "sessions": sessions })))
}

// ---------------------------------------------------------------------------
// Analytics routes

#[derive(Debug, Deserialize)]
struct WeeklySummaryQuery {
    week_start: Option<NaiveDate>,
}

/// Get the weekly summary, Monday through Sunday
async fn weekly_summary(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<WeeklySummaryQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let reference = params.week_start.unwrap_or_else(|| Utc::now().date_naive());
    let monday = reference - Duration::days(i64::from(reference.weekday().num_days_from_monday()));
    let sunday = monday + Duration::days(6);

    let mut records = store
        .history(&user_id, monday, sunday + Duration::days(1))
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load weekly records");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    records.reverse(); // oldest first for trend math

    let summary = stats::weekly_summary(&records);
    let days: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "date": record.date,
                "stress_score": record.stress_prediction.as_ref().map(|p| p.score),
                "stress_level": record.stress_prediction.as_ref().map(|p| p.level),
                "sleep_hours": record.wellbeing.as_ref().and_then(|w| w.sleep_hours),
                "steps": record.wellbeing.as_ref().and_then(|w| w.steps),
                "exercise_sessions": record.sessions.len(),
                "mood_entries": record.mood_entries.len(),
            })
        })
        .collect();

    Ok(Json(json!({
        "week_start": monday,
        "week_end": sunday,
        "summary": summary,
        "records": days,
    })))
}

#[derive(Debug, Deserialize)]
struct InsightsQuery {
    days: Option<i64>,
}

/// Get longer-window insights
async fn insights(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(params): Query<InsightsQuery>,
) -> Result<Json<Value>, StatusCode> {
    let store = store_of(&state)?;
    let today = Utc::now().date_naive();
    let days = params.days.unwrap_or(30).clamp(1, 365);

    let mut records = store
        .history(&user_id, today - Duration::days(days), today + Duration::days(1))
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load insight records");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    records.reverse(); // oldest first for trend math

    let insights = stats::insights(&records);
    Ok(Json(json!({ "insights": insights, "records": records.len() })))
}

// ---------------------------------------------------------------------------
// Router and server wiring

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/daily/stress/predict", post(predict_stress))
        .route("/daily/stress/today", get(stress_today))
        .route("/daily/stress/history", get(stress_history))
        .route("/daily/recommendations/active", get(recommendations_active))
        .route(
            "/daily/recommendations/{index}/complete",
            patch(complete_recommendation),
        )
        .route("/daily/alerts/active", get(alerts_active))
        .route("/daily/alerts/{index}/acknowledge", patch(acknowledge_alert))
        .route("/daily/wellbeing/sync", post(sync_wellbeing))
        .route("/daily/wellbeing/today", get(wellbeing_today))
        .route("/daily/wellbeing", post(save_wellbeing).get(wellbeing_range))
        .route("/daily/mood", post(add_mood))
        .route("/daily/sessions", post(record_session).get(list_sessions))
        .route("/daily/summary/weekly", get(weekly_summary))
        .route("/daily/insights", get(insights))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());
    let model_config = ModelConfig::default();

    // Record store is optional: the API degrades to health/metrics only.
    let store: Option<Arc<dyn RecordStore>> = match PostgresRecordStore::new().await {
        Ok(store) => {
            info!("Postgres connected for API server");
            metrics.database_connected.set(1.0);
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Postgres for API server - daily routes will be unavailable");
            None
        }
    };

    let orchestrator = store.as_ref().map(|store| {
        let catalog = Arc::new(HttpExerciseCatalog::new(config::get_exercises_service_url()));
        Arc::new(PredictionOrchestrator::new(
            store.clone(),
            Arc::new(WeightedStressModel::new(model_config.clone())),
            Arc::new(RuleBasedRecommender::new(catalog, model_config.clone())),
            model_config.clone(),
            Some(metrics.clone()),
        ))
    });

    // Re-prediction triggers ride the shared Redis job queue when present.
    let trigger_queue = match apalis_redis::connect(config::get_redis_url()).await {
        Ok(conn) => Some(apalis_redis::RedisStorage::new(conn)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Redis - write-triggered predictions disabled");
            None
        }
    };

    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: start_time.clone(),
        store,
        orchestrator,
        trigger_queue,
        config: model_config,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
