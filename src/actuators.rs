mod dry_run;
mod sysfs;

pub use dry_run::*;
pub use sysfs::*;

use std::{fmt, io};

use thiserror::Error;

/// BCM GPIO line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(pub u8);

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Sets named outputs on or off. No acknowledgement beyond the returned result.
pub trait ActuatorSink {
    fn set(&mut self, pin: Pin, on: bool) -> Result<(), ActuatorError>;
}

impl<T: ActuatorSink + ?Sized> ActuatorSink for Box<T> {
    fn set(&mut self, pin: Pin, on: bool) -> Result<(), ActuatorError> {
        (**self).set(pin, on)
    }
}

#[derive(Error, Debug)]
pub enum ActuatorError {
    #[error("pin {0} is not configured as an output")]
    UnknownPin(Pin),

    #[error("failed to drive {pin}: {source}")]
    Io {
        pin: Pin,
        #[source]
        source: io::Error,
    },
}
