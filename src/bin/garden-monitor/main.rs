mod args;

use std::{io, process::ExitCode};

use anyhow::{Context as _, Result};
use args::{Args, GpioKind, SourceKind};
use clap::Parser as _;
use smart_garden::{
    actuators::{ActuatorSink, DryRunPins, SysfsGpio},
    db::SqliteStore,
    observe::{ConsoleSink, DashboardSink, DisplayMode, ObservationSink},
    sampling::SamplingLoop,
    sensors::{ReplaySensors, SensorSource, SimulatedSensors},
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = run().await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_writer(io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let config = args.garden_config()?;
    info!("Running the {} garden.", args.variant);

    let sensors: Box<dyn SensorSource> = match args.source {
        SourceKind::Simulated => Box::new(SimulatedSensors::new(
            args.seed,
            config.soil_sensors,
            config.sea_level_pressure_hpa,
        )),
        SourceKind::Replay => {
            let path = args
                .replay_file
                .as_deref()
                .context("--replay-file is required with --source replay")?;
            Box::new(ReplaySensors::open(path)?)
        }
    };

    // Dropping the GPIO handle at the end of this scope releases the relays.
    let actuators: Box<dyn ActuatorSink> = match args.gpio {
        GpioKind::Sysfs => {
            Box::new(SysfsGpio::open(&config.pins()).context("failed to open GPIO outputs")?)
        }
        GpioKind::DryRun => Box::new(DryRunPins::new(&config.pins())),
    };

    let observer: Box<dyn ObservationSink> = match args.display() {
        DisplayMode::Console => Box::new(ConsoleSink::new(io::stdout())),
        DisplayMode::Dashboard => Box::new(DashboardSink::new(io::stdout(), &config)),
    };

    if !args.database.exists() {
        warn!(
            "Database {:?} does not exist; readings will not be stored until garden-db-setup has run.",
            args.database
        );
    }
    let store = SqliteStore::new(&args.database);
    info!("Storing readings in {:?}.", store.path());

    let mut sampling = SamplingLoop::new(
        config,
        args.timezone,
        sensors,
        actuators,
        store,
        observer,
    )
    .context("invalid garden configuration")?;

    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received ctrl-c."),
            Err(e) => error!("Failed to listen for ctrl_c. Error: {}", e),
        }
        ctrl_c_token.cancel();
    });

    let summary = sampling
        .run(token)
        .await
        .context("sampling loop terminated")?;

    info!("Wrote {} of {} readings.", summary.rows_written, summary.cycles);

    Ok(())
}
