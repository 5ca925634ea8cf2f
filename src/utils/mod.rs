//! Utils Module - Helper Functions & Shared Utilities

pub mod constants;
pub mod telemetry;
pub mod upload;

pub use constants::*;
pub use telemetry::*;
pub use upload::*;
