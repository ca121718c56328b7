use thiserror::Error;

/// Request-input validation errors exposed by `fredgate-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid dataset '{value}', expected one of gdp, inflation, interest-rates, unemployment, housing-starts")]
    InvalidDataset { value: String },

    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid format '{value}', expected one of json, csv")]
    InvalidFormat { value: String },
}

impl ValidationError {
    /// Stable machine-readable code used in error response bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidDataset { .. } => "request.invalid_dataset",
            Self::InvalidDate { .. } => "request.invalid_date",
            Self::InvalidFormat { .. } => "request.invalid_format",
        }
    }
}

/// Errors produced by the upstream fetch pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-success upstream response, status and body carried verbatim.
    #[error("upstream returned status {status}")]
    Upstream { status: u16, body: String },

    /// The request never produced an upstream response.
    #[error("upstream transport error: {message}")]
    Transport { message: String },

    /// The upstream answered 200 but the payload violates its own contract.
    #[error("malformed upstream payload: {message}")]
    Malformed { message: String },
}

impl FetchError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream.error",
            Self::Transport { .. } => "upstream.transport",
            Self::Malformed { .. } => "upstream.malformed",
        }
    }
}
