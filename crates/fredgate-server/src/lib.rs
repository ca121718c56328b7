//! fredgate HTTP surface.
//!
//! The request handler state machine lives here: dataset resolution, the
//! quota charge on developer routes, upstream fetch, and response shaping
//! with the status-code contract (400 unknown dataset, 401 unknown key,
//! 429 exhausted quota, upstream status pass-through on upstream failure).

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
