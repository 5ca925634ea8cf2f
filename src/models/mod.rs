//! Models Module - Data Structures & Configuration
//!
//! Scan records, the application error type and server configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
