use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use selfupdate_gen::cli::Cli;
use selfupdate_gen::config::PublishConfig;
use selfupdate_gen::{Publisher, publish_path};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = PublishConfig::new(&cli.output, &cli.release_version)?;
    if let Some(jobs) = cli.jobs {
        config = config.with_workers(jobs);
    }

    let publisher = Publisher::new(config)
        .with_context(|| format!("cannot open repository {:?}", cli.output))?;
    let reports = publish_path(&publisher, &cli.path, &cli.platform)
        .with_context(|| format!("failed to publish {:?} as {}", cli.path, cli.release_version))?;

    for report in &reports {
        println!(
            "{} {}: {} patches, manifest sha256 {}",
            report.platform,
            report.version,
            report.patched.len(),
            report.manifest.sha256_hex()
        );
    }

    Ok(())
}
