//! # Sales Math
//!
//! Numeric building blocks used by the sales forecasting pipeline.
//! This crate has no knowledge of dates or tables; it works on plain
//! `f64` slices whose positions are evenly spaced steps.
//!
//! - [`interpolation`]: straight-line gap filling

use thiserror::Error;

pub mod interpolation;

pub use interpolation::{fill_interior_gaps, lerp};

/// Errors that can occur in numeric calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for numeric operations
pub type Result<T> = std::result::Result<T, MathError>;
