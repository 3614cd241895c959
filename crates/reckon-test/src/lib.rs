//! Reckon Test Harness - Simulated links and tracking scenarios
//!
//! This crate provides:
//! - A seeded jittery, lossy, reordering link
//! - Ground-truth trajectories to sample from
//! - A scenario runner measuring how closely an extrapolator tracks the truth

pub mod link_sim;
pub mod scenario;
pub mod trajectory;

pub use link_sim::*;
pub use scenario::*;
pub use trajectory::*;
