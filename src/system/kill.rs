use std::fmt;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Why a termination request failed. `AccessDenied` and `NotFound` are
/// the expected race outcomes; anything else comes back as `Os`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminateError {
    AccessDenied(u32),
    NotFound(u32),
    Os(u32, Errno),
}

impl fmt::Display for TerminateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminateError::AccessDenied(pid) => {
                write!(f, "not permitted to signal process {pid}")
            }
            TerminateError::NotFound(pid) => write!(f, "process {pid} no longer exists"),
            TerminateError::Os(pid, errno) => {
                write!(f, "failed to signal process {pid}: {errno}")
            }
        }
    }
}

impl std::error::Error for TerminateError {}

/// Send SIGTERM to `pid`.
///
/// Success means the signal was delivered, not that the process exited;
/// it may ignore the signal or take its time. Existence is not checked
/// up front: a process that exits between snapshot and request surfaces
/// as `NotFound`. Callers should re-enumerate afterwards to observe the
/// result.
pub fn terminate(pid: u32) -> Result<(), TerminateError> {
    // Zero and out-of-range values would address process groups or
    // wrap negative; they never name a single process.
    let raw = match i32::try_from(pid) {
        Ok(raw) if raw > 0 => raw,
        _ => return Err(TerminateError::NotFound(pid)),
    };

    match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) => Ok(()),
        Err(Errno::EPERM) => Err(TerminateError::AccessDenied(pid)),
        Err(Errno::ESRCH) => Err(TerminateError::NotFound(pid)),
        Err(errno) => Err(TerminateError::Os(pid, errno)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_zero_is_rejected_without_signalling() {
        assert_eq!(terminate(0), Err(TerminateError::NotFound(0)));
    }

    #[test]
    fn out_of_range_pid_is_rejected_without_signalling() {
        assert_eq!(
            terminate(u32::MAX),
            Err(TerminateError::NotFound(u32::MAX))
        );
    }
}
