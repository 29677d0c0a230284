//! Harmonia daily stress service
//!
//! Converts heterogeneous, partially-missing daily signals (sleep, steps,
//! mood entries, historical scores) into a bounded, explainable stress
//! score with recommendations and alerts. Every stage degrades to a valid
//! fallback, so callers always receive a usable prediction.

pub mod alerts;
pub mod config;
pub mod core;
pub mod db;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod recommendations;
pub mod scoring;
pub mod services;
pub mod stress;
