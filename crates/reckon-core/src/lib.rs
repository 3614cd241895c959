//! Reckon Core - Fundamental types and primitives
//!
//! This crate defines the pieces every extrapolator is built on:
//! - The `Element` arithmetic capability (zero, add, subtract, scale, assign)
//! - Bundled bindings for `f64`, `f32` and fixed-size arrays of them
//! - Error types for precondition violations

pub mod element;
pub mod error;

pub use element::*;
pub use error::*;
