use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use procfs::process::Process;
use procfs::{Current, Meminfo, ProcError};

use super::snapshot::{ProcessInfo, Snapshot, matches_filter};

/// Enumerates `/proc` into process snapshots.
///
/// Per-process failures never abort an enumeration. A process whose
/// attribute files hit a permission boundary is still reported, with
/// `ProcessInfo::access_denied` sentinel values; a process that vanished
/// between listing and reading is silently dropped.
///
/// CPU% is the utime+stime delta between two enumerations of the same
/// pid against wall time, so the first observation of any pid reads 0.0.
/// That is inherent to instantaneous CPU sampling, not an error. With
/// multiple threads the value can exceed 100 (up to 100 per core).
pub struct Collector {
    cpu_times: HashMap<u32, (u64, Instant)>,
    ticks_per_second: u64,
    page_size: u64,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        Collector {
            cpu_times: HashMap::new(),
            ticks_per_second: procfs::ticks_per_second(),
            page_size: procfs::page_size(),
        }
    }

    /// Enumerate all visible processes whose name matches `filter`
    /// case-insensitively; an empty filter matches everything.
    ///
    /// Rows come back in `/proc` enumeration order, unsorted. Sentinel
    /// rows are matched on their sentinel name like any other row.
    pub fn enumerate(&mut self, filter: &str) -> Snapshot {
        let needle = filter.to_lowercase();
        let now = Instant::now();
        let mem_total = match Meminfo::current() {
            Ok(meminfo) => meminfo.mem_total,
            Err(err) => {
                log::warn!("meminfo unavailable, memory% will read 0: {err}");
                0
            }
        };

        let entries = match procfs::process::all_processes() {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("process listing failed: {err}");
                return Vec::new();
            }
        };

        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        for entry in entries {
            let prc = match entry {
                Ok(prc) => prc,
                Err(err) => {
                    match classify(err) {
                        ReadFailure::Denied(path) => {
                            // The pid directory itself was unreadable; the
                            // pid is still recoverable from the path.
                            if let Some(pid) = pid_from_path(path.as_deref()) {
                                seen.insert(pid);
                                push_if_match(&mut rows, ProcessInfo::access_denied(pid), &needle);
                            }
                        }
                        ReadFailure::Vanished => {}
                        ReadFailure::Other(err) => {
                            log::debug!("skipping unreadable /proc entry: {err}");
                        }
                    }
                    continue;
                }
            };

            let pid = prc.pid as u32;
            seen.insert(pid);
            if let Some(row) = resolve_row(pid, self.read_row(&prc, pid, mem_total, now)) {
                push_if_match(&mut rows, row, &needle);
            }
        }

        // Drop delta state for pids that no longer exist, so a reused pid
        // starts from a fresh baseline.
        self.cpu_times.retain(|pid, _| seen.contains(pid));
        rows
    }

    fn read_row(
        &mut self,
        prc: &Process,
        pid: u32,
        mem_total: u64,
        now: Instant,
    ) -> Result<ProcessInfo, ProcError> {
        let stat = prc.stat()?;

        let total_ticks = stat.utime + stat.stime;
        let cpu_percent = match self.cpu_times.insert(pid, (total_ticks, now)) {
            Some((prev_ticks, prev_at)) => {
                let elapsed = now.duration_since(prev_at).as_secs_f64();
                if elapsed > 0.0 {
                    let cpu_seconds =
                        total_ticks.saturating_sub(prev_ticks) as f64 / self.ticks_per_second as f64;
                    (cpu_seconds / elapsed * 100.0) as f32
                } else {
                    0.0
                }
            }
            None => 0.0,
        };

        let rss_bytes = (stat.rss as u64).saturating_mul(self.page_size);
        let memory_percent = if mem_total > 0 {
            (rss_bytes as f64 / mem_total as f64 * 100.0) as f32
        } else {
            0.0
        };

        Ok(ProcessInfo {
            pid,
            name: stat.comm,
            status: state_label(stat.state).to_string(),
            cpu_percent,
            memory_percent,
        })
    }
}

/// Apply the per-process failure policy to one read outcome: a
/// permission failure keeps the process as a sentinel row, a vanished
/// process disappears, anything else is logged and skipped.
fn resolve_row(pid: u32, outcome: Result<ProcessInfo, ProcError>) -> Option<ProcessInfo> {
    match outcome {
        Ok(row) => Some(row),
        Err(err) => match classify(err) {
            ReadFailure::Denied(_) => Some(ProcessInfo::access_denied(pid)),
            ReadFailure::Vanished => None,
            ReadFailure::Other(err) => {
                log::debug!("skipping pid {pid}: {err}");
                None
            }
        },
    }
}

fn push_if_match(rows: &mut Snapshot, row: ProcessInfo, needle: &str) {
    if matches_filter(&row.name, needle) {
        rows.push(row);
    }
}

enum ReadFailure {
    Denied(Option<std::path::PathBuf>),
    Vanished,
    Other(ProcError),
}

fn classify(err: ProcError) -> ReadFailure {
    match err {
        ProcError::PermissionDenied(path) => ReadFailure::Denied(path),
        ProcError::NotFound(_) => ReadFailure::Vanished,
        ProcError::Io(io, path) => match io.kind() {
            ErrorKind::PermissionDenied => ReadFailure::Denied(path),
            ErrorKind::NotFound => ReadFailure::Vanished,
            _ => ReadFailure::Other(ProcError::Io(io, path)),
        },
        other => ReadFailure::Other(other),
    }
}

fn pid_from_path(path: Option<&Path>) -> Option<u32> {
    path?
        .components()
        .find_map(|c| c.as_os_str().to_str()?.parse::<u32>().ok())
}

fn state_label(state: char) -> &'static str {
    match state {
        'R' => "running",
        'S' => "sleeping",
        'D' => "disk-sleep",
        'Z' => "zombie",
        'T' => "stopped",
        't' => "tracing-stop",
        'X' | 'x' => "dead",
        'I' => "idle",
        'P' => "parked",
        _ => super::snapshot::STATUS_UNKNOWN,
    }
}
