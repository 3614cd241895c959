//! Reckon Extrapolate - Smooth positions from jittery samples
//!
//! Given position (and optionally velocity) samples that arrive late, out of
//! order or not at all, an [`Extrapolator`] answers "where is the entity
//! now?" for any local time, without visible jumps when new samples land.
//!
//! ```
//! use reckon_extrapolate::Extrapolator;
//!
//! let mut ex = Extrapolator::<f64>::new(2);
//! ex.reset(0.0, 0.0, &[0.0, 0.0]);
//! assert!(ex.add_sample(0.5, 0.6, &[1.0, 0.0]));
//!
//! let mut pos = [0.0; 2];
//! ex.read_position(0.7, &mut pos);
//! assert!(pos[0] > 0.0);
//! ```

pub mod config;
pub mod extrapolator;
pub mod scalar;

pub use config::*;
pub use extrapolator::*;
pub use scalar::*;

pub use reckon_core::{Element, ReckonError, ReckonResult};
