use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Supported logical dataset names and their upstream series identifiers.
///
/// The catalog is fixed at compile time and registered once with the router;
/// resolving a name is an exact, case-sensitive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    Gdp,
    Inflation,
    InterestRates,
    Unemployment,
    HousingStarts,
}

impl Dataset {
    pub const ALL: [Self; 5] = [
        Self::Gdp,
        Self::Inflation,
        Self::InterestRates,
        Self::Unemployment,
        Self::HousingStarts,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gdp => "gdp",
            Self::Inflation => "inflation",
            Self::InterestRates => "interest-rates",
            Self::Unemployment => "unemployment",
            Self::HousingStarts => "housing-starts",
        }
    }

    /// Upstream FRED series identifier for this dataset.
    pub const fn series_id(self) -> &'static str {
        match self {
            Self::Gdp => "GDP",
            Self::Inflation => "CPIAUCSL",
            Self::InterestRates => "FEDFUNDS",
            Self::Unemployment => "UNRATE",
            Self::HousingStarts => "HOUST",
        }
    }

    /// Exact-match lookup; an unknown name is a client error.
    pub fn resolve(name: &str) -> Result<Self, ValidationError> {
        match name {
            "gdp" => Ok(Self::Gdp),
            "inflation" => Ok(Self::Inflation),
            "interest-rates" => Ok(Self::InterestRates),
            "unemployment" => Ok(Self::Unemployment),
            "housing-starts" => Ok(Self::HousingStarts),
            other => Err(ValidationError::InvalidDataset {
                value: other.to_owned(),
            }),
        }
    }
}

impl Display for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::resolve(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_dataset() {
        let dataset = Dataset::resolve("gdp").expect("must resolve");
        assert_eq!(dataset, Dataset::Gdp);
        assert_eq!(dataset.series_id(), "GDP");
    }

    #[test]
    fn rejects_unknown_dataset() {
        let err = Dataset::resolve("gibberish").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDataset { .. }));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let err = Dataset::resolve("GDP").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDataset { .. }));
    }

    #[test]
    fn every_catalog_entry_round_trips_through_resolve() {
        for dataset in Dataset::ALL {
            assert_eq!(Dataset::resolve(dataset.as_str()), Ok(dataset));
        }
    }
}
