//! Request counters and score histograms in Prometheus text exposition
//!
//! No metrics crate is involved: a handful of mutex-guarded counters and
//! fixed-bucket histograms rendered by hand cover the three series the
//! service exposes.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Confidence-score histogram buckets
const CONFIDENCE_BUCKETS: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Response-time histogram buckets (seconds)
const LATENCY_BUCKETS: [f64; 8] = [0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

struct Histogram {
    buckets: &'static [f64],
    counts: Vec<u64>,
    sum: f64,
    count: u64,
}

impl Histogram {
    fn new(buckets: &'static [f64]) -> Self {
        Self {
            buckets,
            counts: vec![0; buckets.len()],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, value: f64) {
        for (i, bound) in self.buckets.iter().enumerate() {
            if value <= *bound {
                self.counts[i] += 1;
            }
        }
        self.sum += value;
        self.count += 1;
    }

    fn render(&self, name: &str, labels: &str, out: &mut String) {
        use std::fmt::Write;

        for (bound, count) in self.buckets.iter().zip(&self.counts) {
            let sep = if labels.is_empty() { "" } else { "," };
            let _ = writeln!(out, "{name}_bucket{{{labels}{sep}le=\"{bound}\"}} {count}");
        }
        let sep = if labels.is_empty() { "" } else { "," };
        let _ = writeln!(out, "{name}_bucket{{{labels}{sep}le=\"+Inf\"}} {}", self.count);
        let suffix = if labels.is_empty() {
            String::new()
        } else {
            format!("{{{labels}}}")
        };
        let _ = writeln!(out, "{name}_sum{suffix} {}", self.sum);
        let _ = writeln!(out, "{name}_count{suffix} {}", self.count);
    }
}

struct MetricsInner {
    requests: BTreeMap<(&'static str, u16), u64>,
    response_time: BTreeMap<&'static str, Histogram>,
    confidence: Histogram,
}

/// Shared service metrics
pub struct Metrics {
    inner: Mutex<MetricsInner>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsInner {
                requests: BTreeMap::new(),
                response_time: BTreeMap::new(),
                confidence: Histogram::new(&CONFIDENCE_BUCKETS),
            }),
        }
    }

    /// Count one request by endpoint and response status
    pub fn record_request(&self, endpoint: &'static str, status: u16) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *inner.requests.entry((endpoint, status)).or_insert(0) += 1;
    }

    /// Observe the duration of one answering call for a strategy
    pub fn record_response_time(&self, strategy: &'static str, seconds: f64) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner
            .response_time
            .entry(strategy)
            .or_insert_with(|| Histogram::new(&LATENCY_BUCKETS))
            .observe(seconds);
    }

    /// Observe one retrieval confidence score
    pub fn record_confidence(&self, confidence: f64) {
        let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        inner.confidence.observe(confidence);
    }

    /// Render all series in Prometheus text exposition format
    pub fn render(&self) -> String {
        use std::fmt::Write;

        let inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut out = String::new();

        let _ = writeln!(out, "# HELP faq_requests_total Total number of requests");
        let _ = writeln!(out, "# TYPE faq_requests_total counter");
        for ((endpoint, status), count) in &inner.requests {
            let _ = writeln!(
                out,
                "faq_requests_total{{endpoint=\"{endpoint}\",status=\"{status}\"}} {count}"
            );
        }

        let _ = writeln!(out, "# HELP faq_response_time_seconds Response time in seconds");
        let _ = writeln!(out, "# TYPE faq_response_time_seconds histogram");
        for (strategy, histogram) in &inner.response_time {
            histogram.render(
                "faq_response_time_seconds",
                &format!("strategy=\"{strategy}\""),
                &mut out,
            );
        }

        let _ = writeln!(out, "# HELP faq_confidence_score Distribution of confidence scores");
        let _ = writeln!(out, "# TYPE faq_confidence_score histogram");
        inner.confidence.render("faq_confidence_score", "", &mut out);

        out
    }
}
