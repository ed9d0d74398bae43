use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Performance metrics for the content-filtering engine
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    // Request processing metrics
    total_requests: AtomicU64,
    blocked_requests: AtomicU64,
    exception_requests: AtomicU64,
    ignored_requests: AtomicU64,

    // Performance metrics
    total_processing_time_ns: AtomicU64,
    avg_processing_time_ns: AtomicU64,
    max_processing_time_ns: AtomicU64,
    min_processing_time_ns: AtomicU64,

    // Index size
    rule_count: AtomicUsize,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMetrics {
    /// Create new performance metrics instance
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                total_requests: AtomicU64::new(0),
                blocked_requests: AtomicU64::new(0),
                exception_requests: AtomicU64::new(0),
                ignored_requests: AtomicU64::new(0),
                total_processing_time_ns: AtomicU64::new(0),
                avg_processing_time_ns: AtomicU64::new(0),
                max_processing_time_ns: AtomicU64::new(0),
                min_processing_time_ns: AtomicU64::new(u64::MAX),
                rule_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Record one `check_url` outcome and how long it took
    pub fn record_request(&self, decision: &crate::rule::Decision, processing_time: Duration) {
        let time_ns = processing_time.as_nanos() as u64;

        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);

        match decision {
            crate::rule::Decision::Block(_) => {
                self.inner.blocked_requests.fetch_add(1, Ordering::Relaxed);
            }
            crate::rule::Decision::Except(_, _) => {
                self.inner.exception_requests.fetch_add(1, Ordering::Relaxed);
            }
            crate::rule::Decision::Ignore => {
                self.inner.ignored_requests.fetch_add(1, Ordering::Relaxed);
            }
        }

        // Update processing time metrics
        self.inner.total_processing_time_ns.fetch_add(time_ns, Ordering::Relaxed);

        // Update max processing time
        self.inner.max_processing_time_ns.fetch_max(time_ns, Ordering::Relaxed);

        // Update min processing time
        loop {
            let current_min = self.inner.min_processing_time_ns.load(Ordering::Relaxed);
            if time_ns >= current_min {
                break;
            }
            if self
                .inner
                .min_processing_time_ns
                .compare_exchange_weak(current_min, time_ns, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                break;
            }
        }

        // Calculate average
        let total_requests = self.inner.total_requests.load(Ordering::Relaxed);
        let total_time = self.inner.total_processing_time_ns.load(Ordering::Relaxed);
        if let Some(avg) = total_time.checked_div(total_requests) {
            self.inner.avg_processing_time_ns.store(avg, Ordering::Relaxed);
        }
    }

    /// Update rule count, called after every index swap
    pub fn set_rule_count(&self, count: usize) {
        self.inner.rule_count.store(count, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.inner.total_requests.load(Ordering::Relaxed),
            blocked_requests: self.inner.blocked_requests.load(Ordering::Relaxed),
            exception_requests: self.inner.exception_requests.load(Ordering::Relaxed),
            ignored_requests: self.inner.ignored_requests.load(Ordering::Relaxed),
            avg_processing_time_ns: self.inner.avg_processing_time_ns.load(Ordering::Relaxed),
            max_processing_time_ns: self.inner.max_processing_time_ns.load(Ordering::Relaxed),
            min_processing_time_ns: {
                let min = self.inner.min_processing_time_ns.load(Ordering::Relaxed);
                if min == u64::MAX {
                    0
                } else {
                    min
                }
            },
            rule_count: self.inner.rule_count.load(Ordering::Relaxed),
            block_rate: self.calculate_block_rate(),
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.inner.total_requests.store(0, Ordering::Relaxed);
        self.inner.blocked_requests.store(0, Ordering::Relaxed);
        self.inner.exception_requests.store(0, Ordering::Relaxed);
        self.inner.ignored_requests.store(0, Ordering::Relaxed);
        self.inner.total_processing_time_ns.store(0, Ordering::Relaxed);
        self.inner.avg_processing_time_ns.store(0, Ordering::Relaxed);
        self.inner.max_processing_time_ns.store(0, Ordering::Relaxed);
        self.inner.min_processing_time_ns.store(u64::MAX, Ordering::Relaxed);
    }

    fn calculate_block_rate(&self) -> f64 {
        let total = self.inner.total_requests.load(Ordering::Relaxed);
        let blocked = self.inner.blocked_requests.load(Ordering::Relaxed);

        if total > 0 {
            (blocked as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Snapshot of performance metrics at a point in time
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub blocked_requests: u64,
    pub exception_requests: u64,
    pub ignored_requests: u64,
    pub avg_processing_time_ns: u64,
    pub max_processing_time_ns: u64,
    pub min_processing_time_ns: u64,
    pub rule_count: usize,
    pub block_rate: f64,
}

impl MetricsSnapshot {
    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Performance timer for measuring request processing time
pub struct PerfTimer {
    start: Instant,
}

impl PerfTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
