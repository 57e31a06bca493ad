use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Which request type a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encode,
    Decode,
}

/// Request counters shared by all handlers.
#[derive(Debug, Clone, Default)]
pub struct ServiceMetrics {
    encode_succeeded: Arc<AtomicU64>,
    encode_failed: Arc<AtomicU64>,
    decode_succeeded: Arc<AtomicU64>,
    decode_failed: Arc<AtomicU64>,
    /// Whole-request time: PNG conversion, engine and artifact store I/O.
    avg_request_time_ms: Arc<AtomicU64>, // Stored as u64 (multiply by 1000)
}

/// Point-in-time copy of the counters, as reported by `GET /health`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub encode_succeeded: u64,
    pub encode_failed: u64,
    pub decode_succeeded: u64,
    pub decode_failed: u64,
    pub avg_request_time_ms: f64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, operation: Operation, success: bool, elapsed: Duration) {
        let counter = match (operation, success) {
            (Operation::Encode, true) => &self.encode_succeeded,
            (Operation::Encode, false) => &self.encode_failed,
            (Operation::Decode, true) => &self.decode_succeeded,
            (Operation::Decode, false) => &self.decode_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.update_request_time(elapsed.as_secs_f64() * 1000.0);
    }

    fn update_request_time(&self, new_time_ms: f64) {
        let current = self.avg_request_time_ms.load(Ordering::Relaxed) as f64 / 1000.0;
        let updated = if current == 0.0 {
            new_time_ms
        } else {
            current * 0.9 + new_time_ms * 0.1 // Exponential moving average
        };
        self.avg_request_time_ms
            .store((updated * 1000.0) as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            encode_succeeded: self.encode_succeeded.load(Ordering::Relaxed),
            encode_failed: self.encode_failed.load(Ordering::Relaxed),
            decode_succeeded: self.decode_succeeded.load(Ordering::Relaxed),
            decode_failed: self.decode_failed.load(Ordering::Relaxed),
            avg_request_time_ms: self.avg_request_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}
