use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::trace;

use crate::{
    garden::{Sample, SoilSample, altitude_from_pressure},
    sensors::{SensorError, SensorSource},
};

/// Random-walk stand-in for the environment, light and soil sensors.
#[derive(Debug)]
pub struct SimulatedSensors {
    rng: StdRng,
    current: Sample,
    sea_level_hpa: f64,
}

impl SimulatedSensors {
    pub fn new(seed: u64, with_soil: bool, sea_level_hpa: f64) -> Self {
        let pressure = 1009.5;
        let soil = with_soil.then_some(SoilSample {
            moisture: 450f64,
            temperature: 18f64,
        });

        Self {
            rng: StdRng::seed_from_u64(seed),
            current: Sample {
                temperature: 22f64,
                gas: 50_000f64,
                humidity: 55f64,
                pressure,
                altitude: altitude_from_pressure(pressure, sea_level_hpa),
                luminosity: 150f64,
                soil,
            },
            sea_level_hpa,
        }
    }
}

impl SensorSource for SimulatedSensors {
    fn read(&mut self) -> Result<Sample, SensorError> {
        let rng = &mut self.rng;
        let s = &mut self.current;

        s.temperature = drift(rng, s.temperature, 0.2, -10f64, 45f64);
        s.gas = drift(rng, s.gas, 500f64, 1_000f64, 300_000f64);
        s.humidity = drift(rng, s.humidity, 0.5, 0f64, 100f64);
        s.pressure = drift(rng, s.pressure, 0.1, 950f64, 1050f64);
        s.altitude = altitude_from_pressure(s.pressure, self.sea_level_hpa);
        s.luminosity = drift(rng, s.luminosity, 15f64, 0f64, 2_000f64);

        if let Some(soil) = s.soil.as_mut() {
            soil.moisture = drift(rng, soil.moisture, 10f64, 200f64, 2_000f64);
            soil.temperature = drift(rng, soil.temperature, 0.1, -5f64, 40f64);
        }

        trace!("Simulated sample: {:?}", s);
        Ok(*s)
    }
}

fn drift(rng: &mut StdRng, value: f64, step: f64, min: f64, max: f64) -> f64 {
    (value + rng.gen_range(-step..=step)).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garden::STANDARD_SEA_LEVEL_PRESSURE_HPA;

    #[test]
    fn same_seed_same_samples() {
        let mut a = SimulatedSensors::new(7, true, STANDARD_SEA_LEVEL_PRESSURE_HPA);
        let mut b = SimulatedSensors::new(7, true, STANDARD_SEA_LEVEL_PRESSURE_HPA);

        for _ in 0..10 {
            assert_eq!(a.read().unwrap(), b.read().unwrap());
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let mut sensors = SimulatedSensors::new(42, true, STANDARD_SEA_LEVEL_PRESSURE_HPA);

        for _ in 0..1_000 {
            let s = sensors.read().unwrap();
            assert!((0f64..=100f64).contains(&s.humidity));
            assert!((0f64..=2_000f64).contains(&s.luminosity));

            let soil = s.soil.expect("soil sample");
            assert!((200f64..=2_000f64).contains(&soil.moisture));
        }
    }

    #[test]
    fn soil_is_absent_when_not_attached() {
        let mut sensors = SimulatedSensors::new(1, false, STANDARD_SEA_LEVEL_PRESSURE_HPA);

        assert_eq!(sensors.read().unwrap().soil, None);
    }
}
