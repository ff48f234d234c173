use chrono::Utc;
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    Error, Result,
    actuators::ActuatorSink,
    db::PersistenceSink,
    garden::{ActuatorState, GardenConfig, Reading},
    observe::ObservationSink,
    sensors::SensorSource,
};

/// Outcome of one completed cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub reading: Reading,

    pub state: ActuatorState,

    /// `false` when the store rejected the row. The cycle still counts.
    pub persisted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub cycles: u64,

    pub rows_written: u64,

    pub persistence_failures: u64,
}

impl LoopSummary {
    fn record(&mut self, report: &CycleReport) {
        self.cycles += 1;
        if report.persisted {
            self.rows_written += 1;
        } else {
            self.persistence_failures += 1;
        }
    }
}

/// Read sensors, switch outputs, store the row, show it, wait. Repeat.
pub struct SamplingLoop<S, A, P, O> {
    config: GardenConfig,
    timezone: Tz,
    sensors: S,
    actuators: A,
    store: P,
    observer: O,
}

impl<S, A, P, O> SamplingLoop<S, A, P, O>
where
    S: SensorSource,
    A: ActuatorSink,
    P: PersistenceSink,
    O: ObservationSink,
{
    pub fn new(
        config: GardenConfig,
        timezone: Tz,
        sensors: S,
        actuators: A,
        store: P,
        observer: O,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            timezone,
            sensors,
            actuators,
            store,
            observer,
        })
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn into_parts(self) -> (S, A, P, O) {
        (self.sensors, self.actuators, self.store, self.observer)
    }

    /// Runs a single cycle without waiting afterwards.
    ///
    /// A sensor failure returns before any output is touched or any row is
    /// written. A store failure is logged and reported in the
    /// [`CycleReport`]; it does not fail the cycle.
    #[tracing::instrument(skip_all)]
    pub async fn cycle(&mut self) -> Result<CycleReport> {
        let taken_at = Utc::now().with_timezone(&self.timezone);
        let sample = self.sensors.read()?;
        let reading = Reading::capture(sample, taken_at, self.config.soil_sensors)?;

        let state = self.config.evaluate(&reading);
        self.apply(&state)?;

        let persisted = match self.store.append(&reading, &state).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to store reading. Error: {}", e);
                false
            }
        };

        self.observer
            .observe(&reading, &state)
            .map_err(Error::Observation)?;

        debug!("Completed cycle: {:?}", state);
        Ok(CycleReport {
            reading,
            state,
            persisted,
        })
    }

    /// Cycles until cancelled, until the configured cycle limit is reached,
    /// or until the first fatal error, which is returned to the caller.
    #[tracing::instrument(skip_all)]
    pub async fn run(&mut self, token: CancellationToken) -> Result<LoopSummary> {
        info!(
            "Started. Light {}, interval {:?}.",
            self.config.light, self.config.interval
        );
        if let Some(notice) = self.config.pump_notice() {
            warn!("{}", notice);
        }

        let mut summary = LoopSummary::default();

        loop {
            if token.is_cancelled() {
                warn!("Cancelled.");
                break;
            }

            let report = self.cycle().await?;
            summary.record(&report);

            if self
                .config
                .max_cycles
                .is_some_and(|max| summary.cycles >= max)
            {
                info!("Reached cycle limit of {}.", summary.cycles);
                break;
            }

            tokio::select! {
                _ = token.cancelled() => {
                    warn!("Cancelled.");
                    break;
                },
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }

        info!(
            "Stopped after {} cycles ({} rows written, {} store failures).",
            summary.cycles, summary.rows_written, summary.persistence_failures
        );
        Ok(summary)
    }

    fn apply(&mut self, state: &ActuatorState) -> Result<()> {
        self.actuators.set(self.config.light.pin, state.light)?;

        if let (Some(pump), Some(on)) = (self.config.pump, state.pump) {
            self.actuators.set(pump.pin, on)?;
        }

        Ok(())
    }
}
