use std::{
    fmt,
    io::{self, Write},
    str::FromStr,
};

use anyhow::{Error, bail};

use crate::garden::{ActuatorState, Field, GardenConfig, Polarity, Reading};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Where each reading is shown to a human.
pub trait ObservationSink {
    fn observe(&mut self, reading: &Reading, state: &ActuatorState) -> io::Result<()>;
}

impl<T: ObservationSink + ?Sized> ObservationSink for Box<T> {
    fn observe(&mut self, reading: &Reading, state: &ActuatorState) -> io::Result<()> {
        (**self).observe(reading, state)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Console,
    Dashboard,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Console => "console",
            DisplayMode::Dashboard => "dashboard",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "console" => Ok(DisplayMode::Console),
            "dashboard" => Ok(DisplayMode::Dashboard),
            _ => bail!("unknown display mode: {}", s),
        }
    }
}

/// One comma-joined line per reading.
#[derive(Debug)]
pub struct ConsoleSink<W> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ObservationSink for ConsoleSink<W> {
    fn observe(&mut self, reading: &Reading, state: &ActuatorState) -> io::Result<()> {
        let mut line = reading.taken_at.format(TIMESTAMP_FORMAT).to_string();
        for value in reading.fields().values() {
            line.push_str(&format!(", {value:.2}"));
        }

        line.push_str(&format!(", light={}", on_off(state.light)));
        if let Some(pump) = state.pump {
            line.push_str(&format!(", pump={}", on_off(pump)));
        }

        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

/// Labelled panel with one value per field, redrawn every reading.
#[derive(Debug)]
pub struct DashboardSink<W> {
    out: W,
    light_polarity: Polarity,
    pump_polarity: Option<Polarity>,
}

impl<W: Write> DashboardSink<W> {
    pub fn new(out: W, config: &GardenConfig) -> Self {
        Self {
            out,
            light_polarity: config.light.rule.polarity,
            pump_polarity: config.pump.map(|p| p.rule.polarity),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn tag(&self, field: Field, state: &ActuatorState) -> Option<String> {
        let (polarity, on, name) = match field {
            Field::Luminosity => (self.light_polarity, state.light, "light"),
            Field::SoilMoisture => (self.pump_polarity?, state.pump?, "pump"),
            _ => return None,
        };

        if !on {
            return None;
        }

        let level = match polarity {
            Polarity::Below | Polarity::AtOrBelow => "LOW",
            Polarity::Above | Polarity::AtOrAbove => "HIGH",
        };
        Some(format!("{level} -> {name} on"))
    }
}

impl<W: Write> ObservationSink for DashboardSink<W> {
    fn observe(&mut self, reading: &Reading, state: &ActuatorState) -> io::Result<()> {
        let mut panel = format!(
            "Smart Garden @ {}\n",
            reading.taken_at.format("%Y-%m-%d %H:%M:%S")
        );

        for (field, value) in reading.fields() {
            let label = format!("{} ({})", field.label(), field.unit());
            panel.push_str(&format!("  {label:<24}{value:>12.2}"));
            if let Some(tag) = self.tag(field, state) {
                panel.push_str(&format!("  {tag}"));
            }
            panel.push('\n');
        }

        writeln!(self.out, "{panel}")?;
        self.out.flush()
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono_tz::Tz;

    use super::*;
    use crate::garden::{Sample, SoilSample, Variant};

    fn reading() -> Reading {
        let sample = Sample {
            temperature: 21.456,
            gas: 1200f64,
            humidity: 40f64,
            pressure: 1001.1,
            altitude: 100.25,
            luminosity: 10f64,
            soil: Some(SoilSample {
                moisture: 500f64,
                temperature: 17.5,
            }),
        };
        let taken_at = Tz::UTC.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        Reading::capture(sample, taken_at, true).unwrap()
    }

    #[test]
    fn console_line_joins_fields_with_commas() {
        let state = ActuatorState {
            light: true,
            pump: Some(false),
        };
        let mut sink = ConsoleSink::new(Vec::new());
        sink.observe(&reading(), &state).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "2024-05-01 12:30:00.000000, 21.46, 1200.00, 40.00, 1001.10, 100.25, 10.00, 500.00, 17.50, light=on, pump=off\n"
        );
    }

    #[test]
    fn dashboard_tags_triggered_outputs() {
        let config = Variant::Soil.config();
        let state = config.evaluate(&reading());
        let mut sink = DashboardSink::new(Vec::new(), &config);
        sink.observe(&reading(), &state).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("Smart Garden @ 2024-05-01 12:30:00\n"));
        assert!(out.contains("Luminosity (lx)"));
        assert!(out.contains("LOW -> light on"));
        assert!(out.contains("HIGH -> pump on"));
        assert_eq!(out.matches('\n').count(), 10);
    }

    #[test]
    fn display_mode_parses() {
        assert_eq!(
            "dashboard".parse::<DisplayMode>().unwrap(),
            DisplayMode::Dashboard
        );
        assert!("gui".parse::<DisplayMode>().is_err());
    }
}
