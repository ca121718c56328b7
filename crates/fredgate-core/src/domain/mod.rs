mod date;
mod observation;

pub use date::SeriesDate;
pub use observation::{
    Observation, ObservationSeries, ObservationValue, SeriesQuery, MISSING_VALUE_SENTINEL,
};
