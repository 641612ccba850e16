//! Safe wrappers for platform-specific unsafe operations.
//!
//! Every `unsafe` block in the codebase lives here. Call sites use the safe
//! public API and never touch `unsafe` directly.

/// Suspend a child process (SIGSTOP). Returns false if the signal could not be sent.
#[cfg(unix)]
pub fn suspend_process(pid: u32) -> bool {
    send_signal(pid, libc::SIGSTOP)
}

/// Continue a suspended child process (SIGCONT). Returns false if the signal could not be sent.
#[cfg(unix)]
pub fn continue_process(pid: u32) -> bool {
    send_signal(pid, libc::SIGCONT)
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: libc::c_int) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }
    // SAFETY: kill is a plain POSIX syscall; a positive pid targets exactly one
    // process and failure is reported through the return value.
    unsafe { libc::kill(pid, signal) == 0 }
}

#[cfg(not(unix))]
pub fn suspend_process(_pid: u32) -> bool {
    false
}

#[cfg(not(unix))]
pub fn continue_process(_pid: u32) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn signalling_pid_zero_is_refused() {
        assert!(!suspend_process(0));
        assert!(!continue_process(0));
    }

    #[test]
    fn signalling_out_of_range_pid_is_refused() {
        assert!(!suspend_process(u32::MAX));
    }

    #[test]
    fn stop_and_continue_a_child() {
        let mut child = std::process::Command::new("sleep")
            .arg("5")
            .spawn()
            .expect("sleep should be available");
        assert!(suspend_process(child.id()));
        assert!(continue_process(child.id()));
        child.kill().ok();
        child.wait().ok();
    }
}
