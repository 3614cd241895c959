//! Error types for Reckon
//!
//! Every variant here is a usage bug, not a runtime data condition. Stale
//! samples and out-of-range queries are ordinary outcomes and are reported as
//! `bool`, never through this type.

use thiserror::Error;

/// Core Reckon errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReckonError {
    #[error("Extrapolator used before reset")]
    NotInitialized,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Extrapolator dimension must be at least 1")]
    ZeroDimension,

    #[error("Packet time {packet_time} is after local time {local_time}")]
    PacketAfterLocalTime { packet_time: f64, local_time: f64 },

    #[error("Sample times must be finite: packet {packet_time}, local {local_time}")]
    NonFiniteTime { packet_time: f64, local_time: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReckonError {
    /// Check that a caller-supplied slice matches the configured dimension
    #[inline]
    pub fn check_dimension(expected: usize, actual: usize) -> ReckonResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(ReckonError::DimensionMismatch { expected, actual })
        }
    }

    /// Check that both timestamps of a sample are finite
    #[inline]
    pub fn check_times(packet_time: f64, local_time: f64) -> ReckonResult<()> {
        if packet_time.is_finite() && local_time.is_finite() {
            Ok(())
        } else {
            Err(ReckonError::NonFiniteTime {
                packet_time,
                local_time,
            })
        }
    }
}

/// Result type for Reckon operations
pub type ReckonResult<T> = Result<T, ReckonError>;
