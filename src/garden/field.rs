use std::{fmt, str::FromStr};

use anyhow::{Error, bail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    Gas,
    Humidity,
    Pressure,
    Altitude,
    Luminosity,
    SoilMoisture,
    SoilTemperature,
}

impl Field {
    pub const ENVIRONMENT: [Field; 6] = [
        Field::Temperature,
        Field::Gas,
        Field::Humidity,
        Field::Pressure,
        Field::Altitude,
        Field::Luminosity,
    ];

    pub const SOIL: [Field; 2] = [Field::SoilMoisture, Field::SoilTemperature];

    /// Column name, shared by the database table and replay CSV headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::Gas => "gas",
            Field::Humidity => "humidity",
            Field::Pressure => "pressure",
            Field::Altitude => "altitude",
            Field::Luminosity => "luminosity",
            Field::SoilMoisture => "soil_moisture",
            Field::SoilTemperature => "soil_temperature",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Temperature => "Temperature",
            Field::Gas => "Gas",
            Field::Humidity => "Humidity",
            Field::Pressure => "Pressure",
            Field::Altitude => "Altitude",
            Field::Luminosity => "Luminosity",
            Field::SoilMoisture => "Soil Moisture",
            Field::SoilTemperature => "Soil Temperature",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Field::Temperature | Field::SoilTemperature => "\u{2103}",
            Field::Gas => "\u{2126}",
            Field::Humidity => "%",
            Field::Pressure => "hPa",
            Field::Altitude => "m",
            Field::Luminosity => "lx",
            // capacitive count reported by the soil sensor
            Field::SoilMoisture => "raw",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(Field::Temperature),
            "gas" => Ok(Field::Gas),
            "humidity" => Ok(Field::Humidity),
            "pressure" => Ok(Field::Pressure),
            "altitude" => Ok(Field::Altitude),
            "luminosity" => Ok(Field::Luminosity),
            "soil_moisture" => Ok(Field::SoilMoisture),
            "soil_temperature" => Ok(Field::SoilTemperature),
            _ => bail!("unknown field: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_parse_back() {
        for field in Field::ENVIRONMENT.iter().chain(Field::SOIL.iter()) {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), *field);
        }
    }

    #[test]
    fn unknown_column_is_rejected() {
        assert!("co2".parse::<Field>().is_err());
    }
}
