use std::io;

use thiserror::Error;

use crate::{actuators::ActuatorError, garden::ConfigError, sensors::SensorError};

/// Errors that stop the sampling loop. Persistence failures never do: the
/// loop logs them and moves on to the next cycle.
#[derive(Error, Debug)]
pub enum Error {
    #[error("sensor read failed: {0}")]
    Sensor(#[from] SensorError),

    #[error("actuator write failed: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("observation sink failed: {0}")]
    Observation(#[source] io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
