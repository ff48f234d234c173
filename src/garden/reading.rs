use chrono::DateTime;
use chrono_tz::Tz;
use indexmap::IndexMap;

use crate::{garden::Field, sensors::SensorError};

pub const STANDARD_SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// Unrounded values as produced by the sensor source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub temperature: f64,

    pub gas: f64,

    pub humidity: f64,

    pub pressure: f64,

    pub altitude: f64,

    pub luminosity: f64,

    pub soil: Option<SoilSample>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilSample {
    pub moisture: f64,

    pub temperature: f64,
}

/// One fully populated row: every value rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub taken_at: DateTime<Tz>,

    pub temperature: f64,

    pub gas: f64,

    pub humidity: f64,

    pub pressure: f64,

    pub altitude: f64,

    pub luminosity: f64,

    pub soil: Option<SoilSample>,
}

impl Reading {
    /// Builds a reading from a raw sample.
    ///
    /// Fails when a value is not finite, or when `with_soil` is set and the
    /// sample carries no soil values. Soil values are dropped when
    /// `with_soil` is unset.
    pub fn capture(
        sample: Sample,
        taken_at: DateTime<Tz>,
        with_soil: bool,
    ) -> Result<Self, SensorError> {
        let soil = match (with_soil, sample.soil) {
            (true, Some(soil)) => Some(SoilSample {
                moisture: checked(Field::SoilMoisture, soil.moisture)?,
                temperature: checked(Field::SoilTemperature, soil.temperature)?,
            }),
            (true, None) => return Err(SensorError::Missing(Field::SoilMoisture)),
            (false, _) => None,
        };

        Ok(Self {
            taken_at,
            temperature: checked(Field::Temperature, sample.temperature)?,
            gas: checked(Field::Gas, sample.gas)?,
            humidity: checked(Field::Humidity, sample.humidity)?,
            pressure: checked(Field::Pressure, sample.pressure)?,
            altitude: checked(Field::Altitude, sample.altitude)?,
            luminosity: checked(Field::Luminosity, sample.luminosity)?,
            soil,
        })
    }

    pub fn soil_moisture(&self) -> Option<f64> {
        self.soil.map(|s| s.moisture)
    }

    pub fn soil_temperature(&self) -> Option<f64> {
        self.soil.map(|s| s.temperature)
    }

    /// Present fields in column order.
    pub fn fields(&self) -> IndexMap<Field, f64> {
        let mut fields: IndexMap<Field, f64> = [
            (Field::Temperature, self.temperature),
            (Field::Gas, self.gas),
            (Field::Humidity, self.humidity),
            (Field::Pressure, self.pressure),
            (Field::Altitude, self.altitude),
            (Field::Luminosity, self.luminosity),
        ]
        .into_iter()
        .collect();

        if let Some(soil) = self.soil {
            fields.insert(Field::SoilMoisture, soil.moisture);
            fields.insert(Field::SoilTemperature, soil.temperature);
        }

        fields
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100f64).round() / 100f64
}

/// International barometric formula, as used by the BME680 driver.
pub fn altitude_from_pressure(pressure_hpa: f64, sea_level_hpa: f64) -> f64 {
    44330f64 * (1f64 - (pressure_hpa / sea_level_hpa).powf(1f64 / 5.255))
}

fn checked(field: Field, v: f64) -> Result<f64, SensorError> {
    if !v.is_finite() {
        return Err(SensorError::InvalidValue { field, value: v });
    }

    Ok(round2(v))
}
