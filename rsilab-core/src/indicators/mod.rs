//! Series helpers over precomputed indicator values.
//!
//! Base indicators (RSI, ATR, OBV) arrive precomputed; this module only
//! derives the small statistics the gates and the scorer need from them.

pub mod regression;

pub use regression::{linear_regression_slope, mean_abs, trailing_finite};
