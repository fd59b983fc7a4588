//! Process runner seam
//!
//! [`SystemRunner`] spawns the real binary with inherited stdio and waits for it,
//! forwarding termination signals. Signal handlers are installed before the
//! spawn, so a failure there leaves no child behind. Tests substitute their own
//! [`ProcessRunner`].

use crate::error::LaunchError;
use async_trait::async_trait;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// Base added to a signal number to form the exit code (`128 + SIGKILL` = 137)
pub const SIGNAL_EXIT_BASE: i32 = 128;

/// How the child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Normal exit with a status code
    Exited(i32),
    /// Killed by a signal (Unix only)
    Signaled(i32),
}

impl ExitOutcome {
    /// Exit code the launcher should report
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => *code,
            ExitOutcome::Signaled(signal) => SIGNAL_EXIT_BASE + signal,
        }
    }

    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return ExitOutcome::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitOutcome::Signaled(signal);
            }
        }

        // wait() never reports stopped/continued children
        ExitOutcome::Exited(1)
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exit code {}", code),
            ExitOutcome::Signaled(signal) => write!(f, "signal {}", signal),
        }
    }
}

/// Runs an external program with the caller's stdio and reports how it ended
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<ExitOutcome, LaunchError>;
}

/// Runs programs as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<ExitOutcome, LaunchError> {
        // Handlers must be in place before the child exists
        let mut relay = SignalRelay::install().map_err(LaunchError::Signals)?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| LaunchError::from_spawn(program.to_path_buf(), e))?;

        let status = relay
            .wait(&mut child)
            .await
            .map_err(|source| LaunchError::Wait {
                path: program.to_path_buf(),
                source,
            })?;

        Ok(ExitOutcome::from_status(status))
    }
}

/// Signal streams held for the lifetime of one child.
///
/// SIGTERM and SIGHUP are always relayed to the child. SIGINT and SIGQUIT
/// typed at a terminal already reach the whole foreground process group, so
/// they are relayed only when the launcher is not in that group (a supervisor
/// or `kill -INT` from elsewhere). A `kill -INT` aimed at a foreground
/// launcher is therefore not passed on.
#[cfg(unix)]
struct SignalRelay {
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalRelay {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
            interrupt: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    async fn wait(&mut self, child: &mut Child) -> io::Result<ExitStatus> {
        use nix::sys::signal::Signal;

        let pid = child.id();
        loop {
            tokio::select! {
                status = child.wait() => return status,
                Some(()) = self.terminate.recv() => forward_signal(pid, Signal::SIGTERM),
                Some(()) = self.hangup.recv() => forward_signal(pid, Signal::SIGHUP),
                Some(()) = self.interrupt.recv() => {
                    if !in_terminal_foreground() {
                        forward_signal(pid, Signal::SIGINT);
                    }
                }
                Some(()) = self.quit.recv() => {
                    if !in_terminal_foreground() {
                        forward_signal(pid, Signal::SIGQUIT);
                    }
                }
            }
        }
    }
}

#[cfg(unix)]
fn forward_signal(pid: Option<u32>, signal: nix::sys::signal::Signal) {
    use nix::unistd::Pid;

    let Some(pid) = pid else {
        return;
    };
    // ESRCH means the child already exited; wait() will report it
    let _ = nix::sys::signal::kill(Pid::from_raw(pid as i32), signal);
}

/// Whether our process group owns the controlling terminal on stdin
#[cfg(unix)]
fn in_terminal_foreground() -> bool {
    let foreground = nix::unistd::tcgetpgrp(std::io::stdin()).ok();
    is_foreground_group(foreground, nix::unistd::getpgrp())
}

#[cfg(unix)]
fn is_foreground_group(
    foreground: Option<nix::unistd::Pid>,
    own_group: nix::unistd::Pid,
) -> bool {
    foreground == Some(own_group)
}

#[cfg(not(unix))]
struct SignalRelay;

#[cfg(not(unix))]
impl SignalRelay {
    fn install() -> io::Result<Self> {
        Ok(Self)
    }

    async fn wait(&mut self, child: &mut Child) -> io::Result<ExitStatus> {
        loop {
            tokio::select! {
                status = child.wait() => return status,
                // Ctrl+C reaches every process attached to the console
                Ok(()) = tokio::signal::ctrl_c() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exited_code_is_verbatim() {
        for code in 0..=255 {
            assert_eq!(ExitOutcome::Exited(code).exit_code(), code);
        }
    }

    #[test]
    fn test_signaled_code_is_offset() {
        assert_eq!(ExitOutcome::Signaled(9).exit_code(), 137);
        assert_eq!(ExitOutcome::Signaled(15).exit_code(), 143);
    }

    #[test]
    #[cfg(unix)]
    fn test_from_status_unix() {
        use std::os::unix::process::ExitStatusExt;

        // Raw wait status: exit code in the high byte, signal in the low bits
        assert_eq!(
            ExitOutcome::from_status(ExitStatus::from_raw(3 << 8)),
            ExitOutcome::Exited(3)
        );
        assert_eq!(
            ExitOutcome::from_status(ExitStatus::from_raw(9)),
            ExitOutcome::Signaled(9)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitOutcome::Exited(2).to_string(), "exit code 2");
        assert_eq!(ExitOutcome::Signaled(15).to_string(), "signal 15");
    }

    #[test]
    #[cfg(unix)]
    fn test_foreground_group_detection() {
        use nix::unistd::Pid;

        let own = Pid::from_raw(4242);
        assert!(is_foreground_group(Some(own), own));
        // Backgrounded, or another job owns the terminal
        assert!(!is_foreground_group(Some(Pid::from_raw(1000)), own));
        // No controlling terminal (daemon, CI, supervisor)
        assert!(!is_foreground_group(None, own));
    }

    #[tokio::test]
    async fn test_relay_installs_repeatedly() {
        for _ in 0..3 {
            assert!(SignalRelay::install().is_ok());
        }
    }
}
