use std::{fmt, str::FromStr};

use anyhow::{Error, bail};

use crate::{
    actuators::Pin,
    garden::{ActuatorConfig, GardenConfig, ThresholdRule},
    observe::DisplayMode,
};

/// Known garden set-ups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Environment sensors and a grow light only. The pump relay is wired
    /// but never switched.
    Basic,

    /// Adds the soil sensors and drives the pump when the soil reads wet
    /// above the threshold.
    Soil,

    /// Touch panel build: relays swapped, dashboard display, pump driven
    /// while the soil reads at or below the threshold.
    Panel,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Soil => "soil",
            Variant::Panel => "panel",
        }
    }

    pub fn config(&self) -> GardenConfig {
        match self {
            Variant::Basic => GardenConfig {
                light: ActuatorConfig {
                    pin: Pin(23),
                    rule: ThresholdRule::below(20f64),
                },
                pump: None,
                idle_pins: vec![Pin(24)],
                soil_sensors: false,
                ..GardenConfig::default()
            },
            Variant::Soil => GardenConfig {
                light: ActuatorConfig {
                    pin: Pin(23),
                    rule: ThresholdRule::below(200f64),
                },
                pump: Some(ActuatorConfig {
                    pin: Pin(24),
                    rule: ThresholdRule::above(400f64),
                }),
                idle_pins: vec![],
                soil_sensors: true,
                ..GardenConfig::default()
            },
            Variant::Panel => GardenConfig {
                light: ActuatorConfig {
                    pin: Pin(24),
                    rule: ThresholdRule::below(100f64),
                },
                pump: Some(ActuatorConfig {
                    pin: Pin(23),
                    rule: ThresholdRule::at_or_below(400f64),
                }),
                idle_pins: vec![],
                soil_sensors: true,
                ..GardenConfig::default()
            },
        }
    }

    pub fn display(&self) -> DisplayMode {
        match self {
            Variant::Basic | Variant::Soil => DisplayMode::Console,
            Variant::Panel => DisplayMode::Dashboard,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Variant::Basic),
            "soil" => Ok(Variant::Soil),
            "panel" => Ok(Variant::Panel),
            _ => bail!("unknown variant: {}", s),
        }
    }
}
