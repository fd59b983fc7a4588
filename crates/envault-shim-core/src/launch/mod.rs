//! Launcher: resolve the platform binary and run it in place of this process
//!
//! The launcher defines no flags of its own. Arguments go to the child untouched,
//! stdio is inherited, and the child's exit status becomes ours. Launch failures
//! use the `env(1)` exit codes (125/126/127) and a signal-killed child maps to
//! `128 + signal`.

pub mod resolve;
pub mod runner;

use crate::error::LaunchError;
use crate::paths::same_file;
use crate::platform::Os;
use crate::product::ProductConfig;
use colored::Colorize;
use std::ffi::OsString;
use std::path::PathBuf;

pub use resolve::{
    choose_package_root, locate_package_root, package_root_from_exe, resolve_binary_path,
};
pub use runner::{ExitOutcome, ProcessRunner, SystemRunner, SIGNAL_EXIT_BASE};

/// Resolves and runs the wrapped binary through a [`ProcessRunner`]
pub struct Launcher<C, R> {
    config: C,
    package_root: PathBuf,
    os: Os,
    runner: R,
    self_exe: Option<PathBuf>,
    debug: bool,
}

impl<C: ProductConfig, R: ProcessRunner> Launcher<C, R> {
    pub fn new(config: C, package_root: PathBuf, os: Os, runner: R) -> Self {
        Self {
            config,
            package_root,
            os,
            runner,
            self_exe: None,
            debug: false,
        }
    }

    /// Refuse to launch when the target is this executable
    pub fn with_self_exe(mut self, exe: PathBuf) -> Self {
        self.self_exe = Some(exe);
        self
    }

    /// Print the resolved path to stderr before launching
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn binary_path(&self) -> PathBuf {
        resolve_binary_path(&self.config, &self.package_root, self.os)
    }

    /// Run the binary once with `args` and report how it ended
    pub async fn launch(&self, args: &[OsString]) -> Result<ExitOutcome, LaunchError> {
        let path = self.binary_path();
        if self.debug {
            eprintln!(
                "{}",
                format!(
                    "{}: launching {} with {} argument(s)",
                    self.config.display_name(),
                    path.display(),
                    args.len()
                )
                .dimmed()
            );
        }

        if !path.exists() {
            return Err(LaunchError::BinaryNotFound { path });
        }

        if let Some(exe) = &self.self_exe {
            if same_file(&path, exe) {
                return Err(LaunchError::SelfReference { path });
            }
        }

        self.runner.run(&path, args).await
    }
}

/// Whether a debug env value turns tracing on (`1`, `true`, `yes`)
pub fn debug_enabled(value: Option<OsString>) -> bool {
    value
        .and_then(|v| v.into_string().ok())
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// "could not start" diagnostic for a launch failure, with a hint when the
/// binary has not been installed
pub fn launch_error_message<C: ProductConfig>(config: &C, err: &LaunchError) -> String {
    let mut message = format!(
        "{} could not start {}: {}",
        format!("{}:", config.display_name()).red().bold(),
        config.display_name(),
        err
    );

    if matches!(err, LaunchError::BinaryNotFound { .. }) {
        message.push_str(&format!(
            "\n  {} run `{}` to set up the binary",
            "hint:".yellow(),
            config.install_command()
        ));
    }
    message
}

/// Note for a child that did not exit normally
///
/// A normal non-zero exit is left silent: the child reports its own failures.
pub fn outcome_message<C: ProductConfig>(config: &C, outcome: ExitOutcome) -> Option<String> {
    match outcome {
        ExitOutcome::Exited(_) => None,
        ExitOutcome::Signaled(_) => Some(format!(
            "{} {} was terminated by {}",
            format!("{}:", config.display_name()).red().bold(),
            config.display_name(),
            outcome
        )),
    }
}

/// Launch once, print any diagnostic to stderr and return the exit code to use
pub async fn run_launcher<C: ProductConfig, R: ProcessRunner>(
    launcher: &Launcher<C, R>,
    args: &[OsString],
) -> i32 {
    match launcher.launch(args).await {
        Ok(outcome) => {
            if let Some(message) = outcome_message(&launcher.config, outcome) {
                eprintln!("{}", message);
            }
            outcome.exit_code()
        }
        Err(err) => {
            eprintln!("{}", launch_error_message(&launcher.config, &err));
            err.exit_code()
        }
    }
}

/// Launch the product for this process and return the exit code to use
pub async fn run<C: ProductConfig>(config: C, args: Vec<OsString>) -> i32 {
    let package_root = match locate_package_root(&config) {
        Ok(root) => root,
        Err(err) => {
            eprintln!("{}", launch_error_message(&config, &err));
            return err.exit_code();
        }
    };

    let debug = debug_enabled(std::env::var_os(config.debug_env()));
    let mut launcher =
        Launcher::new(config, package_root, Os::current(), SystemRunner).with_debug(debug);
    if let Ok(exe) = std::env::current_exe() {
        launcher = launcher.with_self_exe(exe);
    }

    run_launcher(&launcher, &args).await
}
