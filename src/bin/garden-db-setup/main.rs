mod args;

use std::fs;

use anyhow::Context as _;
use args::Args;
use clap::Parser as _;
use smart_garden::db::{count_readings, create_schema, insert_seed_row, open};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(dir) = args.database.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create database directory: {dir:?}"))?;
    }

    let mut conn = open(&args.database, true).await?;

    create_schema(&mut conn).await?;

    if args.seed {
        let id = insert_seed_row(&mut conn)
            .await
            .context("failed to seed database")?;
        println!("Inserted test row {id}");
    }

    let total = count_readings(&mut conn).await?;
    println!("{:?} ready with {} readings", args.database, total);

    Ok(())
}
