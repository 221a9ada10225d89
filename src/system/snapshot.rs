/// Name reported for a process whose attributes could not be read due to
/// a permission boundary. Consumers rely on seeing these rows.
pub const ACCESS_DENIED_NAME: &str = "Access Denied";

/// Status reported when a process state could not be determined.
pub const STATUS_UNKNOWN: &str = "N/A";

/// A row is flagged as high-usage when either percentage exceeds this.
pub const HIGH_USAGE_THRESHOLD: f32 = 50.0;

/// Attributes of one process as observed at enumeration time.
///
/// A `ProcessInfo` is transient: it carries no identity across snapshots,
/// and the OS reuses pids after a process exits.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub status: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
}

impl ProcessInfo {
    /// Sentinel row for a process whose attribute files were unreadable.
    pub fn access_denied(pid: u32) -> Self {
        ProcessInfo {
            pid,
            name: ACCESS_DENIED_NAME.to_string(),
            status: STATUS_UNKNOWN.to_string(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
        }
    }
}

/// One point-in-time enumeration result, in OS enumeration order.
pub type Snapshot = Vec<ProcessInfo>;

/// True when `name` contains the already-lowercased needle, ignoring case.
/// An empty needle matches everything.
pub fn matches_filter(name: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || name.to_lowercase().contains(needle_lower)
}

/// Re-filter an existing snapshot without re-querying the OS.
///
/// Uses the same matcher as the collector, so `filter_snapshot(enumerate(""), f)`
/// is observably equivalent to `enumerate(f)` over the same process set.
pub fn filter_snapshot(snapshot: &[ProcessInfo], filter: &str) -> Snapshot {
    let needle = filter.to_lowercase();
    snapshot
        .iter()
        .filter(|info| matches_filter(&info.name, &needle))
        .cloned()
        .collect()
}

/// Predicate behind row highlighting: either percentage strictly above 50.
pub fn is_high_usage(info: &ProcessInfo) -> bool {
    info.cpu_percent > HIGH_USAGE_THRESHOLD || info.memory_percent > HIGH_USAGE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pid: u32, name: &str, cpu: f32, mem: f32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: name.to_string(),
            status: "running".to_string(),
            cpu_percent: cpu,
            memory_percent: mem,
        }
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let snapshot = vec![
            row(10, "chrome", 1.0, 2.0),
            row(11, "Chrome Helper", 1.0, 2.0),
            row(12, "firefox", 1.0, 2.0),
        ];

        let filtered = filter_snapshot(&snapshot, "chrome");
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].pid, 10);
        assert_eq!(filtered[1].pid, 11);
    }

    #[test]
    fn empty_filter_keeps_every_row_in_order() {
        let snapshot = vec![row(1, "a", 0.0, 0.0), row(2, "b", 0.0, 0.0)];
        assert_eq!(filter_snapshot(&snapshot, ""), snapshot);
    }

    #[test]
    fn access_denied_sentinel_fields() {
        let info = ProcessInfo::access_denied(42);
        assert_eq!(info.pid, 42);
        assert_eq!(info.name, ACCESS_DENIED_NAME);
        assert_eq!(info.status, STATUS_UNKNOWN);
        assert_eq!(info.cpu_percent, 0.0);
        assert_eq!(info.memory_percent, 0.0);
    }

    #[test]
    fn high_usage_threshold_is_strict() {
        assert!(!is_high_usage(&row(1, "p", 50.0, 50.0)));
        assert!(is_high_usage(&row(1, "p", 50.1, 0.0)));
        assert!(is_high_usage(&row(1, "p", 0.0, 50.1)));
        assert!(is_high_usage(&row(1, "p", 99.0, 99.0)));
        assert!(!is_high_usage(&row(1, "p", 0.0, 0.0)));
    }
}
