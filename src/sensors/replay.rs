use std::{fs::File, io::Read, path::Path};

use anyhow::{Context as _, Result, bail};
use csv::{Reader, StringRecord, StringRecordsIntoIter};
use tracing::debug;

use crate::{
    garden::{Field, Sample, SoilSample},
    sensors::{SensorError, SensorSource},
};

const TEMPERATURE_INDEX: usize = 0;
const GAS_INDEX: usize = 1;
const HUMIDITY_INDEX: usize = 2;
const PRESSURE_INDEX: usize = 3;
const ALTITUDE_INDEX: usize = 4;
const LUMINOSITY_INDEX: usize = 5;
const SOIL_MOISTURE_INDEX: usize = 6;
const SOIL_TEMPERATURE_INDEX: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsvFormat {
    Environment,
    EnvironmentSoil,
}

/// Replays samples recorded as CSV, one row per read. The header decides
/// whether soil columns are present.
pub struct ReplaySensors<R = File> {
    records: StringRecordsIntoIter<R>,
    format: CsvFormat,
}

impl ReplaySensors<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open replay file: {path:?}"))?;

        Self::new(file).with_context(|| format!("failed to read replay file: {path:?}"))
    }
}

impl<R: Read> ReplaySensors<R> {
    pub fn new(rdr: R) -> Result<Self> {
        let mut reader = Reader::from_reader(rdr);
        let header = reader
            .headers()
            .context("failed to read CSV header")?
            .clone();

        let format = detect_format(&header)?;
        debug!("Replaying samples in {:?} format.", format);

        Ok(Self {
            records: reader.into_records(),
            format,
        })
    }
}

impl<R: Read> SensorSource for ReplaySensors<R> {
    fn read(&mut self) -> Result<Sample, SensorError> {
        let row = match self.records.next() {
            Some(row) => row?,
            None => return Err(SensorError::Exhausted),
        };

        let soil = match self.format {
            CsvFormat::Environment => None,
            CsvFormat::EnvironmentSoil => Some(SoilSample {
                moisture: parse(&row, Field::SoilMoisture, SOIL_MOISTURE_INDEX)?,
                temperature: parse(&row, Field::SoilTemperature, SOIL_TEMPERATURE_INDEX)?,
            }),
        };

        Ok(Sample {
            temperature: parse(&row, Field::Temperature, TEMPERATURE_INDEX)?,
            gas: parse(&row, Field::Gas, GAS_INDEX)?,
            humidity: parse(&row, Field::Humidity, HUMIDITY_INDEX)?,
            pressure: parse(&row, Field::Pressure, PRESSURE_INDEX)?,
            altitude: parse(&row, Field::Altitude, ALTITUDE_INDEX)?,
            luminosity: parse(&row, Field::Luminosity, LUMINOSITY_INDEX)?,
            soil,
        })
    }
}

fn parse(row: &StringRecord, field: Field, index: usize) -> Result<f64, SensorError> {
    let raw = row.get(index).ok_or(SensorError::Missing(field))?.trim();

    raw.parse().map_err(|_| SensorError::Parse {
        field,
        value: raw.to_owned(),
    })
}

/// Values are read by position, so the header must list the fields in
/// storage order: the environment columns, optionally followed by both soil
/// columns.
fn detect_format(header: &StringRecord) -> Result<CsvFormat> {
    let format = match header.len() {
        6 => CsvFormat::Environment,
        8 => CsvFormat::EnvironmentSoil,
        n => bail!("unexpected CSV header: expected 6 or 8 columns, got {}", n),
    };

    let environment = Field::ENVIRONMENT;
    let soil: &[Field] = match format {
        CsvFormat::Environment => &[],
        CsvFormat::EnvironmentSoil => &Field::SOIL,
    };
    let expected = environment.iter().chain(soil);
    for (index, (name, field)) in header.iter().zip(expected).enumerate() {
        if name.trim() != field.as_str() {
            bail!(
                "unexpected CSV header: column {} is {:?}, expected {:?}",
                index + 1,
                name,
                field.as_str()
            );
        }
    }

    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENVIRONMENT: &str = "\
temperature,gas,humidity,pressure,altitude,luminosity
21.5,10234.1,40.2,1001.3,100.1,12.5
";

    const WITH_SOIL: &str = "\
temperature,gas,humidity,pressure,altitude,luminosity,soil_moisture,soil_temperature
21.5,10234.1,40.2,1001.3,100.1,12.5,512,17.25
22,10000,41,1001,100,abc,512,17
";

    #[test]
    fn replays_environment_rows_then_exhausts() {
        let mut sensors = ReplaySensors::new(ENVIRONMENT.as_bytes()).unwrap();

        let sample = sensors.read().unwrap();
        assert_eq!(sample.luminosity, 12.5);
        assert_eq!(sample.soil, None);

        assert!(matches!(sensors.read(), Err(SensorError::Exhausted)));
    }

    #[test]
    fn detects_soil_columns() {
        let mut sensors = ReplaySensors::new(WITH_SOIL.as_bytes()).unwrap();

        let sample = sensors.read().unwrap();
        assert_eq!(
            sample.soil,
            Some(SoilSample {
                moisture: 512f64,
                temperature: 17.25
            })
        );
    }

    #[test]
    fn malformed_value_names_the_field() {
        let mut sensors = ReplaySensors::new(WITH_SOIL.as_bytes()).unwrap();
        sensors.read().unwrap();

        let err = sensors.read().unwrap_err();
        assert!(matches!(
            err,
            SensorError::Parse {
                field: Field::Luminosity,
                ..
            }
        ));
    }

    #[test]
    fn short_header_is_rejected() {
        assert!(ReplaySensors::new("temperature,gas\n1,2\n".as_bytes()).is_err());
    }

    #[test]
    fn swapped_soil_columns_are_rejected() {
        let csv = "\
temperature,gas,humidity,pressure,altitude,luminosity,soil_temperature,soil_moisture
21.5,10234.1,40.2,1001.3,100.1,12.5,17.25,512
";

        let err = ReplaySensors::new(csv.as_bytes()).err().unwrap();
        assert!(err.to_string().contains("column 7"), "{err}");
    }

    #[test]
    fn leading_timestamp_column_is_rejected() {
        let csv = "\
timestamp,temperature,gas,humidity,pressure,altitude,luminosity,soil_moisture
2024-06-01 06:15:00,21.5,10234.1,40.2,1001.3,100.1,12.5,512
";

        let err = ReplaySensors::new(csv.as_bytes()).err().unwrap();
        assert!(err.to_string().contains("column 1"), "{err}");
    }
}
