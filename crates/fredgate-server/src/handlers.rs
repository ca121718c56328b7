use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use fredgate_core::{transcode, Dataset, ObservationSeries, SeriesDate, SeriesQuery, ValidationError};
use fredgate_keystore::StoreError;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the raw developer credential.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    dataset: String,
    start_date: Option<String>,
    end_date: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    fn resolve(raw: Option<&str>) -> Result<Self, ValidationError> {
        match raw {
            None | Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some(other) => Err(ValidationError::InvalidFormat {
                value: other.to_owned(),
            }),
        }
    }
}

/// Public download path: no credential, no quota charge.
pub async fn download(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let dataset = Dataset::resolve(&params.dataset)?;
    let format = OutputFormat::resolve(params.format.as_deref())?;
    let query = series_query(dataset, params.start_date.as_deref(), params.end_date.as_deref())?;

    let series = state.fred.fetch(&query).await?;
    tracing::info!(dataset = %dataset, rows = series.observations.len(), "public download served");

    match format {
        OutputFormat::Json => Ok(Json(series).into_response()),
        OutputFormat::Csv => {
            let body = transcode::to_csv(&series)?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, String::from("text/csv")),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename={dataset}.csv"),
                    ),
                ],
                body,
            )
                .into_response())
        }
    }
}

/// Developer path, JSON output. Charges one quota unit before fetching.
pub async fn series_json(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
    headers: HeaderMap,
    Query(params): Query<RangeParams>,
) -> Result<Json<ObservationSeries>, ApiError> {
    let series = developer_fetch(&state, &dataset, &headers, &params).await?;
    Ok(Json(series))
}

/// Developer path, CSV output. Same auth and quota rules as the JSON route.
pub async fn series_csv(
    State(state): State<AppState>,
    Path(dataset): Path<String>,
    headers: HeaderMap,
    Query(params): Query<RangeParams>,
) -> Result<Response, ApiError> {
    let series = developer_fetch(&state, &dataset, &headers, &params).await?;
    let body = transcode::to_csv(&series)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, String::from("text/csv"))],
        body,
    )
        .into_response())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The developer request state machine: resolve the dataset, then authorize
/// and charge, then fetch. Resolution comes first so an unknown dataset is
/// rejected as a client error regardless of auth state.
async fn developer_fetch(
    state: &AppState,
    dataset: &str,
    headers: &HeaderMap,
    params: &RangeParams,
) -> Result<ObservationSeries, ApiError> {
    let dataset = Dataset::resolve(dataset)?;
    let query = series_query(dataset, params.start_date.as_deref(), params.end_date.as_deref())?;

    let key = presented_key(headers)?;
    let authorized = state.store.authorize_and_charge(key).await.map_err(|error| {
        tracing::warn!(dataset = %dataset, code = error.code(), "developer request denied");
        error
    })?;

    let series = state.fred.fetch(&query).await?;
    tracing::info!(
        dataset = %dataset,
        rows = series.observations.len(),
        remaining = authorized.remaining,
        "developer request served"
    );
    Ok(series)
}

fn presented_key(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::Credential(StoreError::InvalidCredential))
}

fn series_query(
    dataset: Dataset,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SeriesQuery, ApiError> {
    let start = start.map(SeriesDate::parse).transpose()?;
    let end = end.map(SeriesDate::parse).transpose()?;
    Ok(SeriesQuery::new(dataset, start, end))
}
