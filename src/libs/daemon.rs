//! Background watcher lifecycle.
//!
//! `lookaway watch --background` re-executes the current binary detached
//! from the terminal with the hidden `--daemon-run` flag and records the
//! child's PID in the data directory. `lookaway stop` uses that PID file to
//! terminate it. The detached process shuts down gracefully on SIGTERM or
//! SIGINT (Ctrl-C on Windows) and removes the PID file on the way out.

use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const PID_FILE: &str = "lookaway-watch.pid";

/// Hidden flag that marks the detached child process.
pub const DAEMON_RUN_FLAG: &str = "--daemon-run";

pub fn pid_path() -> Result<PathBuf> {
    DataStorage::new().get_path(PID_FILE)
}

/// Resolves when the process is asked to terminate.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                msg_error!(Message::SignalHandlerFailed(e.to_string()));
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => msg_info!(Message::ReceivedSigterm),
            _ = sigint.recv() => msg_info!(Message::ReceivedSigint),
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => msg_info!(Message::ReceivedCtrlC),
            Err(e) => {
                msg_error!(Message::SignalHandlerFailed(e.to_string()));
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Removes the PID file if it belongs to this process.
pub fn release_pid_file() -> Result<()> {
    let path = pid_path()?;
    if let Ok(content) = std::fs::read_to_string(&path) {
        if content.trim() == std::process::id().to_string() {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Starts a detached watcher, stopping a running one first.
///
/// `args` are forwarded to the child after the `watch` subcommand.
pub fn spawn(args: &[String]) -> Result<u32> {
    let path = pid_path()?;

    if path.exists() {
        if let Ok(pid) = std::fs::read_to_string(&path) {
            msg_info!(Message::StoppingExistingWatcher(pid.trim().to_string()));
        }
        if let Err(e) = stop_internal() {
            msg_warning!(Message::FailedToStopExistingWatcher(e.to_string()));
            let _ = std::fs::remove_file(&path);
        }
        std::thread::sleep(Duration::from_millis(500));
    }

    let current_exe = std::env::current_exe()?;
    let mut command = std::process::Command::new(current_exe);
    command
        .arg("watch")
        .args(args)
        .arg(DAEMON_RUN_FLAG)
        .stdin(std::process::Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // SAFETY: setsid is async-signal-safe and only touches the child.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        command.creation_flags(CREATE_NO_WINDOW);
    }

    let child = command.spawn()?;
    let pid = child.id();
    std::fs::write(&path, pid.to_string())?;
    msg_info!(Message::BackgroundWatcherStarted(pid));
    Ok(pid)
}

/// Stops the background watcher. Not having one running is not an error.
pub fn stop() -> Result<()> {
    if !pid_path()?.exists() {
        msg_info!(Message::WatcherNotRunning);
        return Ok(());
    }
    stop_internal()
}

fn stop_internal() -> Result<()> {
    let path = pid_path()?;
    if !path.exists() {
        msg_bail_anyhow!(Message::PidFileNotFound);
    }

    let pid_str = std::fs::read_to_string(&path)?;
    let pid: u32 = pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;

    let killed = kill_process(pid)?;
    std::fs::remove_file(&path)?;

    if killed {
        msg_info!(Message::BackgroundWatcherStopped(pid));
    } else {
        msg_info!(Message::StalePidFileRemoved(pid));
    }
    Ok(())
}

/// Terminates `pid`, escalating to SIGKILL after about a second.
/// Returns false if no such process existed.
#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(pid as i32);
    match kill(pid, Signal::SIGTERM) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return Ok(false),
        Err(e) => return Err(e.into()),
    }

    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));
        if let Err(Errno::ESRCH) = kill(pid, None) {
            return Ok(true);
        }
    }

    match kill(pid, Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => Ok(true),
        Err(e) => Err(e.into()),
    }
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            // ERROR_INVALID_PARAMETER: no such process
            if error == 87 {
                return Ok(false);
            }
            msg_bail_anyhow!(Message::ProcessTerminationFailed(error.to_string()));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);
        if result == 0 {
            msg_bail_anyhow!(Message::ProcessTerminationFailed(GetLastError().to_string()));
        }
    }
    Ok(true)
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::DaemonModeNotSupported);
}
