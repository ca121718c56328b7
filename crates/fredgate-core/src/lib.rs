//! Core contracts for fredgate.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The fixed dataset catalog and name resolution
//! - The upstream FRED client and its transport seam
//! - CSV transcoding for series output

pub mod dataset;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod transcode;
pub mod upstream;

pub use dataset::Dataset;
pub use domain::{
    Observation, ObservationSeries, ObservationValue, SeriesDate, SeriesQuery,
    MISSING_VALUE_SENTINEL,
};
pub use error::{FetchError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use transcode::TranscodeError;
pub use upstream::{FredClient, DEFAULT_BASE_URL};
