use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::actuators::{ActuatorError, ActuatorSink, Pin};

pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// Relay outputs driven through the Linux sysfs GPIO interface.
///
/// Pins are exported and driven low on open. Dropping the handle drives
/// them low again and unexports them, so the relays are released however
/// the monitor stops.
#[derive(Debug)]
pub struct SysfsGpio {
    root: PathBuf,
    pins: Vec<Pin>,
}

impl SysfsGpio {
    pub fn open(pins: &[Pin]) -> Result<Self, ActuatorError> {
        Self::with_root(SYSFS_GPIO_ROOT, pins)
    }

    pub fn with_root(root: impl Into<PathBuf>, pins: &[Pin]) -> Result<Self, ActuatorError> {
        let mut gpio = Self {
            root: root.into(),
            pins: Vec::with_capacity(pins.len()),
        };

        for &pin in pins {
            gpio.export(pin)?;
            // Dropping `gpio` on a later failure releases this pin.
            gpio.pins.push(pin);
        }

        info!("Exported {} GPIO outputs.", gpio.pins.len());
        Ok(gpio)
    }

    fn pin_dir(&self, pin: Pin) -> PathBuf {
        self.root.join(format!("gpio{}", pin.0))
    }

    fn export(&self, pin: Pin) -> Result<(), ActuatorError> {
        if !self.pin_dir(pin).exists() {
            write(pin, &self.root.join("export"), &pin.0.to_string())?;
        }

        // "low" configures the line as an output already driven low.
        write(pin, &self.pin_dir(pin).join("direction"), "low")?;
        debug!("Exported {pin} as output.");

        Ok(())
    }
}

impl ActuatorSink for SysfsGpio {
    fn set(&mut self, pin: Pin, on: bool) -> Result<(), ActuatorError> {
        if !self.pins.contains(&pin) {
            return Err(ActuatorError::UnknownPin(pin));
        }

        write(
            pin,
            &self.pin_dir(pin).join("value"),
            if on { "1" } else { "0" },
        )
    }
}

impl Drop for SysfsGpio {
    fn drop(&mut self) {
        for &pin in &self.pins {
            if let Err(e) = write(pin, &self.pin_dir(pin).join("value"), "0") {
                warn!("Failed to drive {pin} low on release. Error: {e}");
            }

            if let Err(e) = write(pin, &self.root.join("unexport"), &pin.0.to_string()) {
                warn!("Failed to unexport {pin}. Error: {e}");
            }
        }

        debug!("Released {} GPIO outputs.", self.pins.len());
    }
}

fn write(pin: Pin, path: &Path, contents: &str) -> Result<(), ActuatorError> {
    fs::write(path, contents).map_err(|source| ActuatorError::Io { pin, source })
}
