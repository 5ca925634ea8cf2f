//! Upload API Module
//! `POST /scan` plus health and stats endpoints

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
