//! Core Module - Business Logic
//!
//! Heuristic verdict engine and the read → evaluate scan pipeline.

pub mod analyzer;
pub mod detector;

pub use analyzer::*;
pub use detector::*;
