//! envault installer - prepares `<package-root>/bin` for the launcher

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use envault_shim_core::install::{self, LocalCopyStrategy, ReleaseTag, StrategyRegistry};
use envault_shim_core::launch::locate_package_root;
use envault_shim_core::{Envault, Platform, ProductConfig};
use std::path::PathBuf;

/// CLI version, also the default release to install
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "envault-install")]
#[command(about = "Prepare the envault binary location for the launcher")]
#[command(version)]
pub struct Args {
    /// Package root to install into (defaults to the directory above this executable)
    #[arg(long = "package-root")]
    pub package_root: Option<PathBuf>,

    /// Release tag to install (e.g. v1.2.0)
    #[arg(short, long, default_value = CLI_VERSION)]
    pub release: String,

    /// Copy a locally built envault binary instead of using a release (for development use)
    #[arg(long)]
    pub from: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = Envault;

    let package_root = match args.package_root {
        Some(root) => root,
        None => locate_package_root(&config).context("Failed to locate the package root")?,
    };
    let release = ReleaseTag::parse(&args.release)?;
    let platform = Platform::current();

    let mut registry = StrategyRegistry::from_config(&config)?;
    if let Some(source) = args.from {
        registry.register(platform, Box::new(LocalCopyStrategy::new(source)));
    }

    println!(
        "{}",
        format!(
            "Installing {} {} for {}",
            config.display_name(),
            release,
            platform
        )
        .cyan()
        .bold()
    );

    let report = install::install(&config, &package_root, platform, release, &registry)
        .await
        .with_context(|| format!("Failed to install into {}", package_root.display()))?;

    install::print_report(&config, &report);

    Ok(())
}
