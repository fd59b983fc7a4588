//! Product configuration for the wrapped binary
//!
//! The launcher and installer never hard-code the product they wrap. Everything
//! product-specific (binary name, directory layout, release location, env
//! overrides) comes from a [`ProductConfig`] implementation.

/// Configuration trait for the product being wrapped
///
/// Each wrapped product defines:
/// - Product identity (binary name, display name)
/// - On-disk layout under the package root
/// - Release source for the installer
/// - Environment variable overrides
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Base name of the real binary, without any platform suffix
    fn binary_name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Directory under the package root that holds the real binary
    fn bin_dir(&self) -> &'static str {
        "bin"
    }

    /// Environment variable overriding the package root
    fn package_root_env(&self) -> &'static str;

    /// Default base URL for release artifacts
    fn default_release_url(&self) -> &'static str;

    /// Environment variable overriding the release base URL
    fn release_url_env(&self) -> &'static str;

    /// Environment variable enabling the launcher debug trace
    fn debug_env(&self) -> &'static str;

    /// Command shown to users when the binary is missing
    fn install_command(&self) -> &'static str;
}

/// The envault product
#[derive(Debug, Clone, Copy, Default)]
pub struct Envault;

impl ProductConfig for Envault {
    fn binary_name(&self) -> &'static str {
        "envault"
    }

    fn display_name(&self) -> &'static str {
        "envault"
    }

    fn package_root_env(&self) -> &'static str {
        "ENVAULT_PACKAGE_ROOT"
    }

    fn default_release_url(&self) -> &'static str {
        "https://github.com/envault/envault/releases"
    }

    fn release_url_env(&self) -> &'static str {
        "ENVAULT_RELEASE_URL"
    }

    fn debug_env(&self) -> &'static str {
        "ENVAULT_SHIM_DEBUG"
    }

    fn install_command(&self) -> &'static str {
        "envault-install"
    }
}
