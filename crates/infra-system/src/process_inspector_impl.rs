// Process inspector implementation
// reason: sysinfo for cross-platform process table access
use std::path::PathBuf;
use sysinfo::{Pid, ProcessRefreshKind, System, UpdateKind};
use tracing::debug;

use tfplatform_core::port::{DetectionError, ProcessInspector};

/// Process inspector backed by sysinfo
///
/// Takes a fresh snapshot per lookup; detection only runs once per process
/// so nothing is cached here.
pub struct SysinfoProcessInspector;

impl SysinfoProcessInspector {
    /// Create a new process inspector
    ///
    /// # Example
    /// ```ignore
    /// let inspector = SysinfoProcessInspector::new();
    /// let ppid = inspector.parent_pid()?;
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl Default for SysinfoProcessInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInspector for SysinfoProcessInspector {
    fn parent_pid(&self) -> Result<u32, DetectionError> {
        let current = sysinfo::get_current_pid()
            .map_err(|e| DetectionError::CurrentProcess(e.to_string()))?;

        let mut sys = System::new();
        if !sys.refresh_process_specifics(current, ProcessRefreshKind::new()) {
            return Err(DetectionError::CurrentProcess(format!(
                "pid {current} missing from process table"
            )));
        }

        let parent = sys
            .process(current)
            .and_then(|process| process.parent())
            .ok_or(DetectionError::ParentNotFound(current.as_u32()))?;

        debug!(pid = %current, ppid = %parent, "Resolved parent process");

        Ok(parent.as_u32())
    }

    fn executable_path(&self, pid: u32) -> Result<PathBuf, DetectionError> {
        let target = Pid::from_u32(pid);

        let mut sys = System::new();
        let refresh = ProcessRefreshKind::new().with_exe(UpdateKind::Always);
        if !sys.refresh_process_specifics(target, refresh) {
            return Err(DetectionError::ProcessNotFound(pid));
        }

        let process = sys
            .process(target)
            .ok_or(DetectionError::ProcessNotFound(pid))?;

        match process.exe() {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.to_path_buf()),
            _ => Err(DetectionError::ExecutableUnavailable(pid)),
        }
    }
}
