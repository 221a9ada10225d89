use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 20;

/// System-wide utilization at one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UsageSample {
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub disk_percent: f32,
}

/// Fixed-capacity rolling buffer of aggregate samples.
///
/// The CPU and memory series are index-aligned and always equal length;
/// disk is carried on the latest sample only, not historized. Appending
/// at capacity evicts the oldest entry first, so length never exceeds
/// capacity.
#[derive(Debug)]
pub struct UsageHistory {
    cpu: VecDeque<f32>,
    memory: VecDeque<f32>,
    latest: Option<UsageSample>,
    capacity: usize,
}

impl UsageHistory {
    pub fn new(capacity: usize) -> Self {
        UsageHistory {
            cpu: VecDeque::with_capacity(capacity),
            memory: VecDeque::with_capacity(capacity),
            latest: None,
            capacity,
        }
    }

    pub fn record(&mut self, sample: UsageSample) {
        self.latest = Some(sample);
        // A zero-capacity history keeps the latest sample but no series.
        if self.capacity == 0 {
            return;
        }
        while self.cpu.len() >= self.capacity {
            self.cpu.pop_front();
        }
        while self.memory.len() >= self.capacity {
            self.memory.pop_front();
        }
        self.cpu.push_back(sample.cpu_percent);
        self.memory.push_back(sample.memory_percent);
    }

    /// Copy-on-read view of both series, oldest first.
    pub fn series(&self) -> (Vec<f32>, Vec<f32>) {
        (
            self.cpu.iter().copied().collect(),
            self.memory.iter().copied().collect(),
        )
    }

    pub fn latest(&self) -> Option<UsageSample> {
        self.latest
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
