//! Installer: prepare `<package_root>/bin` and acquire the binary
//!
//! This module provides:
//! - Non-recursive, idempotent creation of the bin directory
//! - Release tag and asset URL handling
//! - Acquisition strategies selected per platform

pub mod release;
pub mod strategy;

use crate::error::InstallError;
use crate::platform::{executable_name, Platform};
use crate::product::ProductConfig;
use colored::Colorize;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

pub use release::{release_asset_name, release_asset_url, release_base_url, ReleaseTag};
pub use strategy::{
    AcquireRequest, AcquireStrategy, Acquisition, LocalCopyStrategy, PlaceholderStrategy,
    StrategyRegistry,
};

/// Whether [`ensure_bin_dir`] had to create the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinDirState {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinDir {
    pub path: PathBuf,
    pub state: BinDirState,
}

/// Make sure `<package_root>/<bin_dir>` exists
///
/// The package root itself must already exist; only the last component is
/// created. Calling this on an existing directory is a no-op.
pub async fn ensure_bin_dir<C: ProductConfig>(
    config: &C,
    package_root: &Path,
) -> Result<BinDir, InstallError> {
    let path = package_root.join(config.bin_dir());

    match fs::create_dir(&path).await {
        Ok(()) => Ok(BinDir {
            path,
            state: BinDirState::Created,
        }),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let is_dir = fs::metadata(&path)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            if is_dir {
                Ok(BinDir {
                    path,
                    state: BinDirState::AlreadyPresent,
                })
            } else {
                Err(InstallError::NotADirectory { path })
            }
        }
        Err(source) => Err(InstallError::CreateDir { path, source }),
    }
}

/// Outcome of a full install run
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub platform: Platform,
    pub bin_dir: BinDir,
    pub strategy: &'static str,
    pub acquisition: Acquisition,
}

/// Prepare the layout, then acquire the binary with the strategy for `platform`
pub async fn install<C: ProductConfig>(
    config: &C,
    package_root: &Path,
    platform: Platform,
    release: ReleaseTag,
    registry: &StrategyRegistry,
) -> Result<InstallReport, InstallError> {
    let bin_dir = ensure_bin_dir(config, package_root).await?;

    let request = AcquireRequest {
        platform,
        release,
        bin_dir: bin_dir.path.clone(),
        binary_file: executable_name(config.binary_name(), platform.os),
    };
    let strategy = registry.select(platform);
    let acquisition = strategy.acquire(&request).await?;

    Ok(InstallReport {
        platform,
        bin_dir,
        strategy: strategy.name(),
        acquisition,
    })
}

/// Print the result of an install run
pub fn print_report<C: ProductConfig>(config: &C, report: &InstallReport) {
    match report.bin_dir.state {
        BinDirState::Created => println!(
            "{} {}",
            "Created".green(),
            report.bin_dir.path.display()
        ),
        BinDirState::AlreadyPresent => println!(
            "{} {}",
            "Using existing".dimmed(),
            report.bin_dir.path.display()
        ),
    }

    match &report.acquisition {
        Acquisition::Placed(path) => println!(
            "{} {} ({})",
            "Installed".green().bold(),
            path.display(),
            report.strategy
        ),
        Acquisition::Deferred { asset_url } => {
            println!(
                "{}",
                format!(
                    "{} installer: downloading release binaries is not implemented yet.",
                    config.display_name()
                )
                .yellow()
            );
            match asset_url {
                Some(url) => println!("  {} {}", "Release asset:".dimmed(), url),
                None => println!(
                    "  {} no release asset is published for {}",
                    "Release asset:".dimmed(),
                    report.platform
                ),
            }
            println!(
                "  Place a {} binary in {} (or pass --from <path>) to use the launcher.",
                config.display_name(),
                report.bin_dir.path.display()
            );
        }
    }
}
