use thiserror::Error;

use crate::{Observation, ObservationSeries, ObservationValue, SeriesDate};

/// Series data that cannot be rendered or re-read as delimited text.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("csv encoding failed: {0}")]
    Encode(#[from] csv::Error),

    #[error("csv output is not valid UTF-8")]
    NotUtf8,

    #[error("csv header must be 'date,value', got '{header}'")]
    BadHeader { header: String },

    #[error("csv row {row} has an invalid date '{value}'")]
    BadDate { row: usize, value: String },
}

/// Renders a series as delimited text: a `date,value` header followed by one
/// row per observation in input order. Fields containing the delimiter, the
/// quote character, or line breaks are quoted per RFC 4180.
///
/// Pure function: no I/O, deterministic, identical input yields byte-identical
/// output.
pub fn to_csv(series: &ObservationSeries) -> Result<String, TranscodeError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["date", "value"])?;
    for observation in &series.observations {
        writer.write_record([observation.date.format_iso().as_str(), observation.value.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| TranscodeError::Encode(error.into_error().into()))?;
    String::from_utf8(bytes).map_err(|_| TranscodeError::NotUtf8)
}

/// Parses delimited text produced by [`to_csv`] back into observations,
/// preserving row order and the missing-value sentinel.
pub fn from_csv(input: &str) -> Result<Vec<Observation>, TranscodeError> {
    let mut reader = csv::Reader::from_reader(input.as_bytes());

    let header = reader.headers()?.clone();
    if header.iter().collect::<Vec<_>>() != ["date", "value"] {
        return Err(TranscodeError::BadHeader {
            header: header.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut observations = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let raw_date = record.get(0).unwrap_or_default();
        let raw_value = record.get(1).unwrap_or_default();

        let date = SeriesDate::parse(raw_date).map_err(|_| TranscodeError::BadDate {
            row: index + 1,
            value: raw_date.to_owned(),
        })?;
        observations.push(Observation::new(date, ObservationValue::parse(raw_value)));
    }

    Ok(observations)
}
