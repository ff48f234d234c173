use std::path::PathBuf;

use clap::Parser;
use smart_garden::db::DEFAULT_DATABASE_PATH;

#[derive(Debug, Parser)]
pub struct Args {
    #[arg(long, env = "GARDEN_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Insert one fixed test row after creating the table.
    #[arg(long)]
    pub seed: bool,
}
