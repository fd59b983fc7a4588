//! envault shim core - launcher and installer for the envault binary
//!
//! This library backs two small binaries that ship alongside a pre-built
//! `envault` executable:
//!
//! - `envault-shim` finds `<package-root>/bin/envault` (`envault.exe` on
//!   Windows) and runs it with the caller's arguments, stdio and exit status.
//! - `envault-install` prepares `<package-root>/bin` and acquires the binary
//!   through a per-platform strategy.
//!
//! # Architecture
//!
//! - **Platform**: explicit `(os, arch)` values, detected once at the edge
//! - **Launch**: path resolution plus a `ProcessRunner` seam for spawning
//! - **Install**: directory preparation plus pluggable `AcquireStrategy`s
//!
//! # Example Usage
//!
//! ```ignore
//! use envault_shim_core::launch::{Launcher, SystemRunner};
//! use envault_shim_core::{Envault, Os};
//!
//! let launcher = Launcher::new(Envault, "/opt/envault".into(), Os::current(), SystemRunner);
//! let outcome = launcher.launch(&args).await?;
//! std::process::exit(outcome.exit_code());
//! ```

pub mod error;
pub mod install;
pub mod launch;
mod paths;
pub mod platform;
pub mod product;

// Re-export main types for convenience
pub use error::{InstallError, LaunchError};
pub use launch::{ExitOutcome, Launcher, ProcessRunner, SystemRunner};
pub use platform::{Arch, Os, Platform};
pub use product::{Envault, ProductConfig};
