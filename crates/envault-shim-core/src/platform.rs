//! Host platform identification
//!
//! Detection happens once, in [`Platform::current`]. Everything downstream takes
//! a [`Platform`] (or an [`Os`]) as a plain value so resolution stays testable
//! on any host.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    MacOS,
    Linux,
    Unknown,
}

impl Os {
    /// Map a host OS identifier (`std::env::consts::OS`, `win32`, `darwin`, ...)
    pub fn from_identifier(id: &str) -> Self {
        match id.to_ascii_lowercase().as_str() {
            "windows" | "win32" | "cygwin" | "msys" => Os::Windows,
            "macos" | "darwin" => Os::MacOS,
            "linux" => Os::Linux,
            _ => Os::Unknown,
        }
    }

    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Suffix the OS requires on executable files
    pub fn exe_suffix(&self) -> &'static str {
        match self {
            Os::Windows => ".exe",
            _ => "",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Os::Windows => "windows",
            Os::MacOS => "macos",
            Os::Linux => "linux",
            Os::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
    Unknown,
}

impl Arch {
    pub fn from_identifier(id: &str) -> Self {
        match id.to_ascii_lowercase().as_str() {
            "x86_64" | "x64" | "amd64" => Arch::X86_64,
            "aarch64" | "arm64" => Arch::Aarch64,
            _ => Arch::Unknown,
        }
    }

    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::ARCH)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// An (os, arch) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// The platform this process is running on
    pub fn current() -> Self {
        Self::new(Os::current(), Arch::current())
    }

    /// Target triple used in release asset names
    ///
    /// Returns `None` when either half of the platform is unknown.
    pub fn target_triple(&self) -> Option<&'static str> {
        let triple = match (self.os, self.arch) {
            (Os::MacOS, Arch::X86_64) => "x86_64-apple-darwin",
            (Os::MacOS, Arch::Aarch64) => "aarch64-apple-darwin",
            (Os::Linux, Arch::X86_64) => "x86_64-unknown-linux-gnu",
            (Os::Linux, Arch::Aarch64) => "aarch64-unknown-linux-gnu",
            (Os::Windows, Arch::X86_64) => "x86_64-pc-windows-msvc",
            (Os::Windows, Arch::Aarch64) => "aarch64-pc-windows-msvc",
            _ => return None,
        };
        Some(triple)
    }

    /// Archive format the release ships for this platform
    pub fn archive_extension(&self) -> &'static str {
        match self.os {
            Os::Windows => ".zip",
            _ => ".tar.gz",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// File name of an executable on the given OS
pub fn executable_name(base: &str, os: Os) -> String {
    format!("{}{}", base, os.exe_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_identifiers() {
        for id in ["win32", "windows", "Windows", "cygwin", "msys"] {
            assert_eq!(Os::from_identifier(id), Os::Windows, "{}", id);
        }
    }

    #[test]
    fn test_other_identifiers() {
        assert_eq!(Os::from_identifier("darwin"), Os::MacOS);
        assert_eq!(Os::from_identifier("linux"), Os::Linux);
        assert_eq!(Os::from_identifier("freebsd"), Os::Unknown);
        assert_eq!(Os::from_identifier(""), Os::Unknown);
    }

    #[test]
    fn test_executable_name_windows() {
        assert_eq!(executable_name("envault", Os::Windows), "envault.exe");
    }

    #[test]
    fn test_executable_name_non_windows() {
        for os in [Os::Linux, Os::MacOS, Os::Unknown] {
            assert_eq!(executable_name("envault", os), "envault");
        }
    }

    #[test]
    fn test_arch_identifiers() {
        assert_eq!(Arch::from_identifier("x64"), Arch::X86_64);
        assert_eq!(Arch::from_identifier("amd64"), Arch::X86_64);
        assert_eq!(Arch::from_identifier("arm64"), Arch::Aarch64);
        assert_eq!(Arch::from_identifier("riscv64"), Arch::Unknown);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_current_os_linux() {
        assert_eq!(Os::current(), Os::Linux);
    }

    #[test]
    #[cfg(target_os = "windows")]
    fn test_current_os_windows() {
        assert_eq!(Os::current(), Os::Windows);
    }

    #[test]
    fn test_target_triples() {
        let linux = Platform::new(Os::Linux, Arch::X86_64);
        assert_eq!(linux.target_triple(), Some("x86_64-unknown-linux-gnu"));

        let mac = Platform::new(Os::MacOS, Arch::Aarch64);
        assert_eq!(mac.target_triple(), Some("aarch64-apple-darwin"));

        let windows = Platform::new(Os::Windows, Arch::X86_64);
        assert_eq!(windows.target_triple(), Some("x86_64-pc-windows-msvc"));
        assert_eq!(windows.archive_extension(), ".zip");
    }

    #[test]
    fn test_unknown_platform_has_no_triple() {
        assert_eq!(Platform::new(Os::Unknown, Arch::X86_64).target_triple(), None);
        assert_eq!(Platform::new(Os::Linux, Arch::Unknown).target_triple(), None);
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(
            Platform::new(Os::MacOS, Arch::Aarch64).to_string(),
            "macos-aarch64"
        );
    }
}
