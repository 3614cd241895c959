//! Reckon Time - Passive estimation of link timing
//!
//! This crate implements the adaptive estimators driving extrapolation:
//! - Asymmetric exponential smoothing (fast rise, slow decay)
//! - Paired latency / update-interval tracking from packet timestamps

pub mod estimator;
pub mod link;

pub use estimator::*;
pub use link::*;
