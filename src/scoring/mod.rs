//! Per-dimension stress sub-scorers.
//!
//! Each scorer maps one input dimension to a 0-100 sub-score where higher
//! means more stress-indicative. All scorers are total functions: missing
//! or invalid input resolves to a documented neutral sub-score instead of
//! an error.
//!
//! History slices are ordered most recent first throughout.

pub mod activity;
pub mod consistency;
pub mod historical;
pub mod mood;
pub mod sleep;
