use std::collections::BTreeMap;

use tracing::info;

use crate::actuators::{ActuatorError, ActuatorSink, Pin};

/// In-memory pin bank for running without relays attached.
#[derive(Debug, Default)]
pub struct DryRunPins {
    levels: BTreeMap<Pin, bool>,
    writes: usize,
}

impl DryRunPins {
    /// All pins start low.
    pub fn new(pins: &[Pin]) -> Self {
        Self {
            levels: pins.iter().map(|pin| (*pin, false)).collect(),
            writes: 0,
        }
    }

    pub fn level(&self, pin: Pin) -> Option<bool> {
        self.levels.get(&pin).copied()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ActuatorSink for DryRunPins {
    fn set(&mut self, pin: Pin, on: bool) -> Result<(), ActuatorError> {
        let Some(level) = self.levels.get_mut(&pin) else {
            return Err(ActuatorError::UnknownPin(pin));
        };

        if *level != on {
            info!("{pin} switched {}.", if on { "on" } else { "off" });
        }

        *level = on;
        self.writes += 1;

        Ok(())
    }
}
