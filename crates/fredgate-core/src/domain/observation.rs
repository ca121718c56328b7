use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Dataset, SeriesDate};

/// Upstream sentinel for an observation with no reported value.
pub const MISSING_VALUE_SENTINEL: &str = ".";

/// Observation value: a decimal kept verbatim as text, or the upstream
/// missing-data sentinel. Never coerced to a float so values round-trip
/// byte-for-byte through transcoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObservationValue {
    Missing,
    Decimal(String),
}

impl ObservationValue {
    pub fn parse(raw: &str) -> Self {
        if raw == MISSING_VALUE_SENTINEL {
            Self::Missing
        } else {
            Self::Decimal(raw.to_owned())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Missing => MISSING_VALUE_SENTINEL,
            Self::Decimal(value) => value.as_str(),
        }
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl Serialize for ObservationValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObservationValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// One date-stamped entry within a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: SeriesDate,
    pub value: ObservationValue,
}

impl Observation {
    pub const fn new(date: SeriesDate, value: ObservationValue) -> Self {
        Self { date, value }
    }
}

/// Ordered upstream series, order preserved exactly as the provider
/// reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSeries {
    pub dataset: Dataset,
    pub series_id: String,
    pub observations: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new(dataset: Dataset, observations: Vec<Observation>) -> Self {
        Self {
            dataset,
            series_id: dataset.series_id().to_owned(),
            observations,
        }
    }
}

/// Immutable per-request query: dataset plus optional inclusive date bounds.
/// An omitted bound means unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesQuery {
    pub dataset: Dataset,
    pub start: Option<SeriesDate>,
    pub end: Option<SeriesDate>,
}

impl SeriesQuery {
    pub const fn new(dataset: Dataset, start: Option<SeriesDate>, end: Option<SeriesDate>) -> Self {
        Self {
            dataset,
            start,
            end,
        }
    }

    pub const fn unbounded(dataset: Dataset) -> Self {
        Self::new(dataset, None, None)
    }
}
