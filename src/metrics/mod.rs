//! Prometheus metrics for the HTTP surface and the prediction pipeline.

use prometheus::{
    Gauge, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub predictions_total: IntCounter,
    pub predictions_cached_total: IntCounter,
    pub prediction_fallbacks_total: IntCounter,
    pub prediction_duration_seconds: Histogram,
    pub alerts_created_total: IntCounter,
    pub database_connected: Gauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests received")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let predictions_total =
            IntCounter::new("predictions_total", "Stress predictions computed")?;
        let predictions_cached_total = IntCounter::new(
            "predictions_cached_total",
            "Prediction requests answered from the staleness cache",
        )?;
        let prediction_fallbacks_total = IntCounter::new(
            "prediction_fallbacks_total",
            "Predictions degraded to a fallback result",
        )?;
        let prediction_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "prediction_duration_seconds",
            "End-to-end prediction latency in seconds",
        ))?;
        let alerts_created_total =
            IntCounter::new("alerts_created_total", "Alerts appended to daily records")?;
        let database_connected =
            Gauge::new("database_connected", "Whether the record store is reachable")?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(predictions_total.clone()))?;
        registry.register(Box::new(predictions_cached_total.clone()))?;
        registry.register(Box::new(prediction_fallbacks_total.clone()))?;
        registry.register(Box::new(prediction_duration_seconds.clone()))?;
        registry.register(Box::new(alerts_created_total.clone()))?;
        registry.register(Box::new(database_connected.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            predictions_total,
            predictions_cached_total,
            prediction_fallbacks_total,
            prediction_duration_seconds,
            alerts_created_total,
            database_connected,
        })
    }

    /// Export all metrics in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = String::new();
        encoder.encode_utf8(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
