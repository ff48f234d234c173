mod replay;
mod simulated;

pub use replay::*;
pub use simulated::*;

use thiserror::Error;

use crate::garden::{Field, Sample};

/// Produces one sample per call. Reads block until every sensor answered.
pub trait SensorSource {
    fn read(&mut self) -> Result<Sample, SensorError>;
}

impl<T: SensorSource + ?Sized> SensorSource for Box<T> {
    fn read(&mut self) -> Result<Sample, SensorError> {
        (**self).read()
    }
}

#[derive(Error, Debug)]
pub enum SensorError {
    #[error("failed to communicate with {sensor}: {message}")]
    Communication {
        sensor: &'static str,
        message: String,
    },

    #[error("no more samples available")]
    Exhausted,

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: Field, value: f64 },

    #[error("missing value for {0}")]
    Missing(Field),

    #[error("failed to parse {field}: {value:?}")]
    Parse { field: Field, value: String },

    #[error("failed to read recorded sample: {0}")]
    Csv(#[from] csv::Error),
}
