use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{FetchError, Observation, ObservationSeries, ObservationValue, SeriesDate, SeriesQuery};

/// Default FRED observations endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// Upstream client for the FRED observations endpoint.
///
/// Holds the shared upstream credential and the injected transport; one
/// outbound call per `fetch` invocation, no retries, failures propagate
/// immediately.
#[derive(Clone)]
pub struct FredClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl FredClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: api_key.into(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Fetches the series for `query`, restricted to its optional inclusive
    /// date bounds. An omitted bound is left out of the upstream query and
    /// means unbounded in that direction.
    pub fn fetch<'a>(
        &'a self,
        query: &'a SeriesQuery,
    ) -> Pin<Box<dyn Future<Output = Result<ObservationSeries, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.observations_url(query);
            let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| FetchError::Transport {
                    message: error.message().to_owned(),
                })?;

            if !response.is_success() {
                return Err(FetchError::Upstream {
                    status: response.status,
                    body: response.body,
                });
            }

            let payload: ObservationsPayload =
                serde_json::from_str(&response.body).map_err(|error| FetchError::Malformed {
                    message: error.to_string(),
                })?;

            let observations = payload
                .observations
                .into_iter()
                .map(|raw| raw.into_observation())
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ObservationSeries::new(query.dataset, observations))
        })
    }

    fn observations_url(&self, query: &SeriesQuery) -> String {
        let mut url = format!(
            "{}?series_id={}&api_key={}&file_type=json",
            self.base_url,
            urlencoding::encode(query.dataset.series_id()),
            urlencoding::encode(&self.api_key),
        );
        if let Some(start) = query.start {
            url.push_str("&observation_start=");
            url.push_str(&start.format_iso());
        }
        if let Some(end) = query.end {
            url.push_str("&observation_end=");
            url.push_str(&end.format_iso());
        }
        url
    }
}

/// Wire shape of the FRED observations payload; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ObservationsPayload {
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

impl RawObservation {
    fn into_observation(self) -> Result<Observation, FetchError> {
        let date = SeriesDate::parse(&self.date).map_err(|_| FetchError::Malformed {
            message: format!("upstream observation date '{}' is not YYYY-MM-DD", self.date),
        })?;
        Ok(Observation::new(date, ObservationValue::parse(&self.value)))
    }
}
