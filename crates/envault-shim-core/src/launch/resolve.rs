//! Binary path and package root resolution

use crate::error::LaunchError;
use crate::platform::{executable_name, Os};
use crate::product::ProductConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `<package_root>/<bin_dir>/<binary>[.exe]`
pub fn resolve_binary_path<C: ProductConfig>(config: &C, package_root: &Path, os: Os) -> PathBuf {
    package_root
        .join(config.bin_dir())
        .join(executable_name(config.binary_name(), os))
}

/// Package root for a launcher installed as `<root>/<dir>/<launcher>`
pub fn package_root_from_exe(exe: &Path) -> Option<PathBuf> {
    exe.parent()?.parent().map(Path::to_path_buf)
}

/// Pick the package root from an explicit override or the launcher's own location
///
/// An empty override is treated as unset.
pub fn choose_package_root(
    override_root: Option<OsString>,
    exe: Option<PathBuf>,
) -> Result<PathBuf, LaunchError> {
    if let Some(root) = override_root.filter(|r| !r.is_empty()) {
        return Ok(PathBuf::from(root));
    }

    let exe = exe.ok_or_else(|| {
        LaunchError::PackageRoot("the launcher's own path is unavailable".to_string())
    })?;
    // Follow symlinks such as node_modules/.bin entries back to the real install
    let exe = std::fs::canonicalize(&exe).unwrap_or(exe);

    package_root_from_exe(&exe).ok_or_else(|| {
        LaunchError::PackageRoot(format!("{} has no parent directory", exe.display()))
    })
}

/// Locate the package root for this process
pub fn locate_package_root<C: ProductConfig>(config: &C) -> Result<PathBuf, LaunchError> {
    choose_package_root(
        std::env::var_os(config.package_root_env()),
        std::env::current_exe().ok(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Envault;

    #[test]
    fn test_resolve_linux() {
        let path = resolve_binary_path(&Envault, Path::new("/opt/envault"), Os::Linux);
        assert_eq!(path, PathBuf::from("/opt/envault/bin/envault"));
    }

    #[test]
    fn test_resolve_macos_has_no_suffix() {
        let path = resolve_binary_path(&Envault, Path::new("/opt/envault"), Os::MacOS);
        assert_eq!(path, PathBuf::from("/opt/envault/bin/envault"));
    }

    #[test]
    fn test_resolve_windows() {
        let root = Path::new("C:\\envault");
        let path = resolve_binary_path(&Envault, root, Os::Windows);
        assert_eq!(path, root.join("bin").join("envault.exe"));
        assert_eq!(path.file_name().unwrap(), "envault.exe");
    }

    #[test]
    fn test_package_root_from_exe() {
        let root = package_root_from_exe(Path::new("/opt/envault/bin/envault-shim"));
        assert_eq!(root, Some(PathBuf::from("/opt/envault")));
    }

    #[test]
    fn test_package_root_from_exe_too_shallow() {
        assert_eq!(package_root_from_exe(Path::new("envault-shim")), None);
    }

    #[test]
    fn test_override_wins() {
        let root = choose_package_root(
            Some(OsString::from("/srv/envault")),
            Some(PathBuf::from("/opt/envault/bin/envault-shim")),
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/srv/envault"));
    }

    #[test]
    fn test_empty_override_ignored() {
        let root = choose_package_root(
            Some(OsString::new()),
            Some(PathBuf::from("/opt/envault/bin/envault-shim")),
        )
        .unwrap();
        assert_eq!(root, PathBuf::from("/opt/envault"));
    }

    #[test]
    fn test_missing_exe_is_an_error() {
        let err = choose_package_root(None, None).unwrap_err();
        assert!(matches!(err, LaunchError::PackageRoot(_)));
        assert_eq!(err.exit_code(), 125);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlinked_launcher_resolves_to_real_package() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("node_modules").join("envault");
        std::fs::create_dir_all(pkg.join("bin")).unwrap();
        let shim = pkg.join("bin").join("envault-shim");
        std::fs::write(&shim, b"").unwrap();

        let dot_bin = dir.path().join("node_modules").join(".bin");
        std::fs::create_dir(&dot_bin).unwrap();
        let link = dot_bin.join("envault");
        std::os::unix::fs::symlink(&shim, &link).unwrap();

        let root = choose_package_root(None, Some(link)).unwrap();
        assert_eq!(root, std::fs::canonicalize(&pkg).unwrap());
    }

    #[test]
    fn test_unresolvable_exe_used_as_given() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("gone").join("bin").join("envault-shim");

        let root = choose_package_root(None, Some(exe)).unwrap();
        assert_eq!(root, dir.path().join("gone"));
    }
}
