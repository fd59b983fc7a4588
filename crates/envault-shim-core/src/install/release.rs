//! Release tags and asset URLs

use crate::error::InstallError;
use crate::platform::Platform;
use crate::product::ProductConfig;
use semver::Version;
use std::fmt;
use url::Url;

/// A release tag such as `v1.2.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag(Version);

impl ReleaseTag {
    /// Parse a tag, with or without the leading `v`
    pub fn parse(tag: &str) -> Result<Self, InstallError> {
        let cleaned = tag.strip_prefix('v').unwrap_or(tag);
        Version::parse(cleaned)
            .map(Self)
            .map_err(|source| InstallError::InvalidRelease {
                tag: tag.to_string(),
                source,
            })
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Release base URL from the env override, falling back to the product default
pub fn release_base_url<C: ProductConfig>(config: &C) -> Result<Url, InstallError> {
    let url_str = std::env::var(config.release_url_env())
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_release_url().to_string());
    Url::parse(&url_str).map_err(|_| InstallError::InvalidUrl(url_str))
}

/// `<binary>-<target-triple><archive-ext>`
pub fn release_asset_name(binary_name: &str, platform: Platform) -> Result<String, InstallError> {
    let triple = platform
        .target_triple()
        .ok_or(InstallError::UnsupportedPlatform(platform))?;
    Ok(format!(
        "{}-{}{}",
        binary_name,
        triple,
        platform.archive_extension()
    ))
}

/// `<base>/download/<tag>/<asset>`, keeping any path and query already on `base`
pub fn release_asset_url(base: &Url, tag: &ReleaseTag, asset: &str) -> Result<Url, InstallError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| InstallError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push("download")
        .push(&tag.to_string())
        .push(asset);
    Ok(url)
}
