//! Axum router configuration.
//!
//! ```text
//! /
//! ├── /health          - liveness probe
//! ├── /download        - public, unmetered series download (json or csv)
//! ├── /:dataset        - developer JSON series (X-API-Key, quota-charged)
//! └── /:dataset/csv    - developer CSV series (X-API-Key, quota-charged)
//! ```
//!
//! Dataset names resolve against the fixed catalog in
//! [`fredgate_core::Dataset`]; the table is registered once here at startup.
//! Literal routes are matched before the `:dataset` parameter, so `/download`
//! and `/health` never shadow a dataset.

use axum::routing::get;
use axum::Router;

use crate::handlers::{download, health, series_csv, series_json};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/download", get(download))
        .route("/:dataset", get(series_json))
        .route("/:dataset/csv", get(series_csv))
        .with_state(state)
}
