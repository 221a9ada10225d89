use std::fmt;
use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};

use super::history::UsageSample;

/// Aggregate sampling failed for this tick; the scheduler carries on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleError {
    DiskNotFound(PathBuf),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::DiskNotFound(path) => {
                write!(f, "no disk mounted at {}", path.display())
            }
        }
    }
}

impl std::error::Error for SampleError {}

/// Reads system-wide CPU, memory, and disk utilization.
///
/// Global CPU% is a delta between refreshes, so the first sample after
/// construction reads low; at the 1 s default tick every later sample is
/// meaningful. The three metrics are read back to back within one call,
/// best-effort simultaneous.
pub struct Sampler {
    sys: System,
    disks: Disks,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Sampler {
            sys,
            disks: Disks::new_with_refreshed_list(),
        }
    }

    /// One atomic read of all three metrics. `disk_path` is the mount
    /// point to report disk usage for, `/` in the default config.
    pub fn sample(&mut self, disk_path: &Path) -> Result<UsageSample, SampleError> {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let cpu_percent = self.sys.global_cpu_usage();
        let total_memory = self.sys.total_memory();
        let memory_percent = if total_memory > 0 {
            (self.sys.used_memory() as f64 / total_memory as f64 * 100.0) as f32
        } else {
            0.0
        };

        self.disks.refresh(true);
        let disk_percent = self
            .disks
            .list()
            .iter()
            .find(|disk| disk.mount_point() == disk_path)
            .map(|disk| {
                let total = disk.total_space();
                if total > 0 {
                    ((total - disk.available_space()) as f64 / total as f64 * 100.0) as f32
                } else {
                    0.0
                }
            })
            .ok_or_else(|| SampleError::DiskNotFound(disk_path.to_path_buf()))?;

        Ok(UsageSample {
            cpu_percent,
            memory_percent,
            disk_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mount_point_is_a_typed_error() {
        let mut sampler = Sampler::new();
        let missing = Path::new("/definitely/not/a/mount");
        match sampler.sample(missing) {
            Err(SampleError::DiskNotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected DiskNotFound, got {other:?}"),
        }
    }

    #[test]
    fn root_sample_reports_sane_percentages() {
        let mut sampler = Sampler::new();
        let sample = sampler
            .sample(Path::new("/"))
            .expect("root filesystem should always be mounted");

        assert!(sample.memory_percent >= 0.0 && sample.memory_percent <= 100.0);
        assert!(sample.disk_percent >= 0.0 && sample.disk_percent <= 100.0);
        assert!(sample.cpu_percent >= 0.0);
    }
}
