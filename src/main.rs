// certharvest - Concurrent TLS certificate chain harvester
// Licensed under GPL-3.0

use anyhow::{Context, Result};
use certharvest::output::{json, terminal};
use certharvest::{Args, HarvestConfig, HarvestResult, harvest, harvest_all};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::WARN);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let args = Args::parse();

    // Handle --config-example (write example config and exit)
    if let Some(path) = &args.config_example {
        HarvestConfig::create_example(path)?;
        println!("✓ Example configuration saved to: {}", path.display());
        return Ok(());
    }

    let config = args.harvest_config()?;
    info!(
        "Harvesting {} targets (timeout {:?})",
        args.targets.len(),
        config.effective_timeout()
    );

    let mut failed = 0;
    let mut succeeded = 0;

    if args.collects_first() {
        let results = harvest_all(&config, args.targets.clone()).await;
        for result in &results {
            tally(result, &mut succeeded, &mut failed);
        }

        if args.pretty {
            println!("{}", json::generate_json(&results, true)?);
        } else {
            for result in &results {
                emit(&args, result)?;
            }
        }
    } else {
        let mut stream = harvest(&config, args.targets.clone());
        while let Some(result) = stream.recv().await {
            tally(&result, &mut succeeded, &mut failed);
            emit(&args, &result)?;
        }
    }

    if !args.json {
        println!("{}", terminal::summary_line(succeeded, failed));
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn tally(result: &HarvestResult, succeeded: &mut usize, failed: &mut usize) {
    if result.is_success() {
        *succeeded += 1;
    } else {
        *failed += 1;
    }
}

fn emit(args: &Args, result: &HarvestResult) -> Result<()> {
    if args.json {
        println!("{}", json::generate_json_line(result)?);
    } else {
        print!("{}", result);
    }
    Ok(())
}
