//! Error types for launching and installing

use crate::platform::Platform;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code when the binary does not exist
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit code when the binary exists but cannot be executed
pub const EXIT_NOT_EXECUTABLE: i32 = 126;
/// Exit code for any other launcher failure
pub const EXIT_LAUNCH_FAILED: i32 = 125;

/// Failure to start (or wait for) the wrapped binary
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("could not determine the package root: {0}")]
    PackageRoot(String),

    #[error("binary not found at {}", path.display())]
    BinaryNotFound { path: PathBuf },

    #[error("{} is not executable", path.display())]
    NotExecutable { path: PathBuf },

    #[error("{} resolves to the launcher itself", path.display())]
    SelfReference { path: PathBuf },

    #[error("failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install signal handlers: {0}")]
    Signals(#[source] io::Error),

    #[error("failed to wait for {}: {source}", path.display())]
    Wait {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Map a spawn failure to the most specific variant
    pub fn from_spawn(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => LaunchError::BinaryNotFound { path },
            io::ErrorKind::PermissionDenied => LaunchError::NotExecutable { path },
            _ => LaunchError::Spawn { path, source },
        }
    }

    /// Process exit code the launcher reports for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchError::BinaryNotFound { .. } => EXIT_NOT_FOUND,
            LaunchError::NotExecutable { .. } | LaunchError::SelfReference { .. } => {
                EXIT_NOT_EXECUTABLE
            }
            LaunchError::PackageRoot(_)
            | LaunchError::Signals(_)
            | LaunchError::Spawn { .. }
            | LaunchError::Wait { .. } => EXIT_LAUNCH_FAILED,
        }
    }
}

/// Failure while preparing the package layout or acquiring the binary
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exists but is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("no release asset is published for {0}")]
    UnsupportedPlatform(Platform),

    #[error("invalid release tag '{tag}': {source}")]
    InvalidRelease {
        tag: String,
        #[source]
        source: semver::Error,
    },

    #[error("invalid release URL '{0}'")]
    InvalidUrl(String),

    #[error("local binary not found at {}", path.display())]
    SourceMissing { path: PathBuf },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}
