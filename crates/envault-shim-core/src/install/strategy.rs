//! Pluggable binary acquisition, keyed by platform

use super::release::{release_asset_name, release_asset_url, release_base_url, ReleaseTag};
use crate::error::InstallError;
use crate::paths::same_file;
use crate::platform::Platform;
use crate::product::ProductConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;
use url::Url;

/// What a strategy is asked to do
#[derive(Debug, Clone)]
pub struct AcquireRequest {
    pub platform: Platform,
    pub release: ReleaseTag,
    /// Directory the binary must end up in
    pub bin_dir: PathBuf,
    /// File name of the binary inside `bin_dir`
    pub binary_file: String,
}

impl AcquireRequest {
    pub fn destination(&self) -> PathBuf {
        self.bin_dir.join(&self.binary_file)
    }
}

/// Result of running a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// The binary is now at this path
    Placed(PathBuf),
    /// Nothing was placed; the binary would come from this release asset,
    /// if one is published for the platform
    Deferred { asset_url: Option<Url> },
}

#[async_trait]
pub trait AcquireStrategy: Send + Sync {
    /// Short label for user-facing output
    fn name(&self) -> &'static str;

    async fn acquire(&self, request: &AcquireRequest) -> Result<Acquisition, InstallError>;
}

/// Computes the release asset URL without fetching it
#[derive(Debug, Clone)]
pub struct PlaceholderStrategy {
    base_url: Url,
    binary_name: &'static str,
}

impl PlaceholderStrategy {
    pub fn new(base_url: Url, binary_name: &'static str) -> Self {
        Self {
            base_url,
            binary_name,
        }
    }

    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, InstallError> {
        Ok(Self::new(release_base_url(config)?, config.binary_name()))
    }
}

#[async_trait]
impl AcquireStrategy for PlaceholderStrategy {
    fn name(&self) -> &'static str {
        "release (not implemented)"
    }

    async fn acquire(&self, request: &AcquireRequest) -> Result<Acquisition, InstallError> {
        let asset = match release_asset_name(self.binary_name, request.platform) {
            Ok(asset) => asset,
            Err(InstallError::UnsupportedPlatform(_)) => {
                return Ok(Acquisition::Deferred { asset_url: None });
            }
            Err(e) => return Err(e),
        };
        let asset_url = release_asset_url(&self.base_url, &request.release, &asset)?;
        Ok(Acquisition::Deferred {
            asset_url: Some(asset_url),
        })
    }
}

/// Copies a locally built binary into place
#[derive(Debug, Clone)]
pub struct LocalCopyStrategy {
    source: PathBuf,
}

impl LocalCopyStrategy {
    pub fn new(source: PathBuf) -> Self {
        Self { source }
    }
}

#[async_trait]
impl AcquireStrategy for LocalCopyStrategy {
    fn name(&self) -> &'static str {
        "local copy"
    }

    async fn acquire(&self, request: &AcquireRequest) -> Result<Acquisition, InstallError> {
        let is_file = fs::metadata(&self.source)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(InstallError::SourceMissing {
                path: self.source.clone(),
            });
        }

        let dest = request.destination();
        let copy_err = |source| InstallError::Copy {
            from: self.source.clone(),
            to: dest.clone(),
            source,
        };

        // Copying a file onto itself truncates it
        if !same_file(&self.source, &dest) {
            fs::copy(&self.source, &dest).await.map_err(copy_err)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&dest).await.map_err(copy_err)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&dest, perms).await.map_err(copy_err)?;
        }

        Ok(Acquisition::Placed(dest))
    }
}

/// Strategies by platform, with a fallback for everything unregistered
pub struct StrategyRegistry {
    strategies: HashMap<Platform, Box<dyn AcquireStrategy>>,
    fallback: Box<dyn AcquireStrategy>,
}

impl StrategyRegistry {
    pub fn new(fallback: Box<dyn AcquireStrategy>) -> Self {
        Self {
            strategies: HashMap::new(),
            fallback,
        }
    }

    /// Default registry for a product: the release placeholder everywhere
    pub fn from_config<C: ProductConfig>(config: &C) -> Result<Self, InstallError> {
        Ok(Self::new(Box::new(PlaceholderStrategy::from_config(config)?)))
    }

    /// Use `strategy` for `platform`, replacing any earlier registration
    pub fn register(&mut self, platform: Platform, strategy: Box<dyn AcquireStrategy>) {
        self.strategies.insert(platform, strategy);
    }

    pub fn select(&self, platform: Platform) -> &dyn AcquireStrategy {
        match self.strategies.get(&platform) {
            Some(strategy) => strategy.as_ref(),
            None => self.fallback.as_ref(),
        }
    }
}
