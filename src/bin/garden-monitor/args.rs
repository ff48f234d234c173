use std::{path::PathBuf, time::Duration};

use anyhow::{Result, bail};
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use smart_garden::{
    db::DEFAULT_DATABASE_PATH,
    garden::{GardenConfig, Polarity, Variant},
    observe::DisplayMode,
};
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Simulated,
    Replay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GpioKind {
    Sysfs,
    DryRun,
}

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "GARDEN_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    #[arg(long, env = "TZ", default_value = "UTC")]
    pub timezone: Tz,

    /// basic, soil or panel
    #[arg(long, env = "GARDEN_VARIANT", default_value = "soil")]
    pub variant: Variant,

    #[arg(long)]
    pub light_threshold: Option<f64>,

    #[arg(long)]
    pub pump_threshold: Option<f64>,

    /// below, above, at-or-below or at-or-above
    #[arg(long)]
    pub pump_polarity: Option<Polarity>,

    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many cycles instead of running until ctrl-c.
    #[arg(long)]
    pub cycles: Option<u64>,

    #[arg(long, value_enum, default_value_t = SourceKind::Simulated)]
    pub source: SourceKind,

    #[arg(long, required_if_eq("source", "replay"))]
    pub replay_file: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    #[arg(long, value_enum, default_value_t = GpioKind::DryRun)]
    pub gpio: GpioKind,

    /// console or dashboard; defaults to the variant's display
    #[arg(long)]
    pub display: Option<DisplayMode>,

    #[arg(long, env = "GARDEN_LOG", default_value = "info")]
    pub log_level: LevelFilter,
}

impl Args {
    pub fn garden_config(&self) -> Result<GardenConfig> {
        let mut config = self.variant.config();

        if let Some(threshold) = self.light_threshold {
            config.light.rule.threshold = threshold;
        }

        match config.pump.as_mut() {
            Some(pump) => {
                if let Some(threshold) = self.pump_threshold {
                    pump.rule.threshold = threshold;
                }
                if let Some(polarity) = self.pump_polarity {
                    pump.rule.polarity = polarity;
                }
            }
            None if self.pump_threshold.is_some() || self.pump_polarity.is_some() => {
                bail!("variant {} has no pump to configure", self.variant)
            }
            None => {}
        }

        if let Some(ms) = self.interval_ms {
            config.interval = Duration::from_millis(ms);
        }
        config.max_cycles = self.cycles;

        Ok(config)
    }

    pub fn display(&self) -> DisplayMode {
        self.display.unwrap_or(self.variant.display())
    }
}
