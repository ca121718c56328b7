//! CSV transcoding contract: exact delimited-text shape, RFC 4180 quoting,
//! purity, and lossless round-trips through the public API.

use fredgate_core::transcode::{from_csv, to_csv};
use fredgate_core::{Dataset, Observation, ObservationSeries, ObservationValue, SeriesDate};

fn series(rows: &[(&str, &str)]) -> ObservationSeries {
    let observations = rows
        .iter()
        .map(|(date, value)| {
            Observation::new(
                SeriesDate::parse(date).expect("valid date"),
                ObservationValue::parse(value),
            )
        })
        .collect();
    ObservationSeries::new(Dataset::Gdp, observations)
}

#[test]
fn renders_expected_header_and_rows_byte_for_byte() {
    let csv = to_csv(&series(&[("2020-01-01", "100"), ("2020-02-01", ".")]))
        .expect("transcode succeeds");
    assert_eq!(csv, "date,value\n2020-01-01,100\n2020-02-01,.\n");
}

#[test]
fn identical_input_yields_byte_identical_output() {
    let input = series(&[
        ("2019-10-01", "21694.458"),
        ("2020-01-01", "21481.367"),
        ("2020-04-01", "."),
    ]);

    let first = to_csv(&input).expect("first render");
    let second = to_csv(&input).expect("second render");
    assert_eq!(first, second);
}

#[test]
fn round_trip_preserves_order_and_values() {
    // Deliberately not date-sorted: upstream order must be preserved, not
    // re-sorted.
    let input = series(&[
        ("2020-03-01", "3.5"),
        ("2020-01-01", "3.6"),
        ("2020-02-01", "."),
    ]);

    let rendered = to_csv(&input).expect("render");
    let parsed = from_csv(&rendered).expect("parse");

    assert_eq!(parsed, input.observations);
    let rerendered = to_csv(&ObservationSeries::new(Dataset::Gdp, parsed)).expect("re-render");
    assert_eq!(rerendered, rendered);
}

#[test]
fn comma_bearing_value_survives_quoting() {
    let input = series(&[("2020-01-01", "1,234.56")]);

    let rendered = to_csv(&input).expect("render");
    assert!(rendered.contains("\"1,234.56\""));

    let parsed = from_csv(&rendered).expect("parse");
    assert_eq!(parsed[0].value.as_str(), "1,234.56");
}

#[test]
fn quote_bearing_value_survives_escaping() {
    let input = series(&[("2020-01-01", "a\"b")]);

    let rendered = to_csv(&input).expect("render");
    let parsed = from_csv(&rendered).expect("parse");
    assert_eq!(parsed[0].value.as_str(), "a\"b");
}

#[test]
fn missing_sentinel_survives_round_trip() {
    let input = series(&[("2020-01-01", ".")]);

    let parsed = from_csv(&to_csv(&input).expect("render")).expect("parse");
    assert!(parsed[0].value.is_missing());
    assert_eq!(parsed[0].value.as_str(), ".");
}
