use std::{collections::BTreeSet, fmt, time::Duration};

use thiserror::Error;

use crate::{
    actuators::Pin,
    garden::{ActuatorState, Reading, STANDARD_SEA_LEVEL_PRESSURE_HPA, ThresholdRule},
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorConfig {
    pub pin: Pin,

    pub rule: ThresholdRule,
}

impl fmt::Display for ActuatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pin, self.rule)
    }
}

/// Everything that differs between garden set-ups: pin assignment,
/// thresholds and whether soil sensors are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct GardenConfig {
    pub light: ActuatorConfig,

    pub pump: Option<ActuatorConfig>,

    /// Outputs that are wired but not driven by any rule. Held low.
    pub idle_pins: Vec<Pin>,

    pub soil_sensors: bool,

    pub interval: Duration,

    pub sea_level_pressure_hpa: f64,

    pub max_cycles: Option<u64>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("pump rule requires soil sensors")]
    PumpWithoutSoilSensors,

    #[error("pin {0} is assigned more than once")]
    DuplicatePin(Pin),

    #[error("cycle interval must be greater than zero")]
    ZeroInterval,

    #[error("threshold must be finite, got {0}")]
    NonFiniteThreshold(f64),

    #[error("cycle limit must be greater than zero")]
    ZeroCycles,
}

impl GardenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pump.is_some() && !self.soil_sensors {
            return Err(ConfigError::PumpWithoutSoilSensors);
        }

        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        if self.max_cycles == Some(0) {
            return Err(ConfigError::ZeroCycles);
        }

        let rules = std::iter::once(&self.light).chain(self.pump.iter());
        for actuator in rules {
            if !actuator.rule.threshold.is_finite() {
                return Err(ConfigError::NonFiniteThreshold(actuator.rule.threshold));
            }
        }

        let mut seen = BTreeSet::new();
        for pin in self.pins() {
            if !seen.insert(pin) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }

        Ok(())
    }

    /// Every output pin, driven or idle.
    pub fn pins(&self) -> Vec<Pin> {
        std::iter::once(self.light.pin)
            .chain(self.pump.map(|p| p.pin))
            .chain(self.idle_pins.iter().copied())
            .collect()
    }

    /// Operator warning naming the pump pin, direction and threshold in
    /// effect. The wet/dry direction differs between builds, so it is
    /// always announced at startup.
    pub fn pump_notice(&self) -> Option<String> {
        self.pump.map(|pump| {
            format!(
                "Pump on {} switches on while soil moisture is {} {}. Confirm this polarity matches the soil sensor.",
                pump.pin, pump.rule.polarity, pump.rule.threshold
            )
        })
    }

    pub fn evaluate(&self, reading: &Reading) -> ActuatorState {
        ActuatorState {
            light: self.light.rule.is_on(reading.luminosity),
            pump: self.pump.map(|pump| {
                reading
                    .soil_moisture()
                    .is_some_and(|moisture| pump.rule.is_on(moisture))
            }),
        }
    }
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            light: ActuatorConfig {
                pin: Pin(23),
                rule: ThresholdRule::below(20f64),
            },
            pump: None,
            idle_pins: vec![],
            soil_sensors: false,
            interval: DEFAULT_INTERVAL,
            sea_level_pressure_hpa: STANDARD_SEA_LEVEL_PRESSURE_HPA,
            max_cycles: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Tz;

    use super::*;
    use crate::garden::{Sample, SoilSample};

    fn reading(luminosity: f64, moisture: f64) -> Reading {
        let sample = Sample {
            temperature: 20f64,
            gas: 1000f64,
            humidity: 50f64,
            pressure: 1013.25,
            altitude: 0f64,
            luminosity,
            soil: Some(SoilSample {
                moisture,
                temperature: 15f64,
            }),
        };
        let taken_at = Tz::UTC.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Reading::capture(sample, taken_at, true).unwrap()
    }

    fn with_pump() -> GardenConfig {
        GardenConfig {
            pump: Some(ActuatorConfig {
                pin: Pin(24),
                rule: ThresholdRule::above(400f64),
            }),
            soil_sensors: true,
            ..GardenConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GardenConfig::default().validate(), Ok(()));
    }

    #[test]
    fn pump_needs_soil_sensors() {
        let config = GardenConfig {
            soil_sensors: false,
            ..with_pump()
        };

        assert_eq!(config.validate(), Err(ConfigError::PumpWithoutSoilSensors));
    }

    #[test]
    fn duplicate_pins_are_rejected() {
        let config = GardenConfig {
            idle_pins: vec![Pin(24)],
            ..with_pump()
        };

        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(Pin(24))));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = GardenConfig {
            interval: Duration::ZERO,
            ..GardenConfig::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }

    #[test]
    fn zero_cycle_limit_is_rejected() {
        let config = GardenConfig {
            max_cycles: Some(0),
            ..GardenConfig::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::ZeroCycles));
    }

    #[test]
    fn pump_notice_names_pin_direction_and_threshold() {
        assert_eq!(
            with_pump().pump_notice().unwrap(),
            "Pump on GPIO24 switches on while soil moisture is above 400. Confirm this polarity matches the soil sensor."
        );
        assert_eq!(GardenConfig::default().pump_notice(), None);
    }

    #[test]
    fn actuator_config_displays_pin_and_rule() {
        let light = GardenConfig::default().light;

        assert_eq!(light.to_string(), "GPIO23 on below 20");
    }

    #[test]
    fn evaluate_drives_light_and_pump_independently() {
        let config = with_pump();

        let state = config.evaluate(&reading(10f64, 500f64));
        assert_eq!(
            state,
            ActuatorState {
                light: true,
                pump: Some(true)
            }
        );

        let state = config.evaluate(&reading(250f64, 300f64));
        assert_eq!(
            state,
            ActuatorState {
                light: false,
                pump: Some(false)
            }
        );
    }

    #[test]
    fn evaluate_without_pump_leaves_pump_unset() {
        let state = GardenConfig::default().evaluate(&reading(10f64, 500f64));

        assert_eq!(state.pump, None);
        assert!(state.light);
    }
}
