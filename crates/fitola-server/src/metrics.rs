//! Prometheus-compatible metrics for the Fitola server.
//!
//! Tracks requests, LLM traffic, workflow runs and outbound gateway calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    http_requests_total: AtomicU64,
    /// 4xx + 5xx responses.
    http_errors_total: AtomicU64,
    chat_messages_total: AtomicU64,
    llm_calls_total: AtomicU64,
    llm_errors_total: AtomicU64,
    llm_input_tokens_total: AtomicU64,
    llm_output_tokens_total: AtomicU64,
    workflow_runs_total: AtomicU64,
    /// Shared with `MemoryManager`, which ticks it on every write.
    memory_writes_total: Arc<AtomicU64>,
    gateway_requests_total: AtomicU64,
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                http_requests_total: AtomicU64::new(0),
                http_errors_total: AtomicU64::new(0),
                chat_messages_total: AtomicU64::new(0),
                llm_calls_total: AtomicU64::new(0),
                llm_errors_total: AtomicU64::new(0),
                llm_input_tokens_total: AtomicU64::new(0),
                llm_output_tokens_total: AtomicU64::new(0),
                workflow_runs_total: AtomicU64::new(0),
                memory_writes_total: Arc::new(AtomicU64::new(0)),
                gateway_requests_total: AtomicU64::new(0),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn inc_http_requests(&self) {
        self.inner
            .http_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_http_errors(&self) {
        self.inner.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_chat_messages(&self) {
        self.inner
            .chat_messages_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_llm_calls(&self) {
        self.inner.llm_calls_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_llm_errors(&self) {
        self.inner.llm_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_llm_tokens(&self, input: u32, output: u32) {
        self.inner
            .llm_input_tokens_total
            .fetch_add(input as u64, Ordering::Relaxed);
        self.inner
            .llm_output_tokens_total
            .fetch_add(output as u64, Ordering::Relaxed);
    }

    pub fn inc_workflow_runs(&self) {
        self.inner
            .workflow_runs_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Counter handed to the memory manager so every write path is counted.
    pub fn memory_writes_counter(&self) -> Arc<AtomicU64> {
        self.inner.memory_writes_total.clone()
    }

    pub fn inc_gateway_requests(&self) {
        self.inner
            .gateway_requests_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Render metrics in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        let m = &self.inner;
        let counters: [(&str, &str, &AtomicU64); 10] = [
            ("http_requests_total", "Total HTTP requests served.", &m.http_requests_total),
            ("http_errors_total", "Total HTTP errors (4xx/5xx).", &m.http_errors_total),
            ("chat_messages_total", "Total chat messages processed.", &m.chat_messages_total),
            ("llm_calls_total", "Total LLM API calls.", &m.llm_calls_total),
            ("llm_errors_total", "Total failed LLM API calls.", &m.llm_errors_total),
            ("llm_input_tokens_total", "Total LLM input tokens.", &m.llm_input_tokens_total),
            ("llm_output_tokens_total", "Total LLM output tokens.", &m.llm_output_tokens_total),
            ("workflow_runs_total", "Total workflows executed.", &m.workflow_runs_total),
            ("memory_writes_total", "Total memory writes.", &*m.memory_writes_total),
            ("gateway_requests_total", "Total Rube gateway requests.", &m.gateway_requests_total),
        ];

        let mut out = format!(
            "# HELP fitola_uptime_seconds Time since the server started.\n\
             # TYPE fitola_uptime_seconds gauge\n\
             fitola_uptime_seconds {}\n",
            m.started_at.elapsed().as_secs()
        );
        for (name, help, value) in counters {
            out.push_str(&format!(
                "\n# HELP fitola_{name} {help}\n# TYPE fitola_{name} counter\nfitola_{name} {}\n",
                value.load(Ordering::Relaxed)
            ));
        }
        out
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_counter_increments() {
        let m = Metrics::new();
        m.inc_http_requests();
        m.inc_http_requests();
        m.inc_chat_messages();
        m.inc_workflow_runs();
        let output = m.render_prometheus();
        assert!(output.contains("fitola_http_requests_total 2"));
        assert!(output.contains("fitola_chat_messages_total 1"));
        assert!(output.contains("fitola_workflow_runs_total 1"));
        assert!(output.contains("fitola_gateway_requests_total 0"));
    }

    #[test]
    fn test_metrics_tokens() {
        let m = Metrics::new();
        m.add_llm_tokens(100, 50);
        m.add_llm_tokens(200, 100);
        let output = m.render_prometheus();
        assert!(output.contains("fitola_llm_input_tokens_total 300"));
        assert!(output.contains("fitola_llm_output_tokens_total 150"));
    }

    #[test]
    fn test_memory_writes_read_from_shared_counter() {
        let m = Metrics::new();
        m.memory_writes_counter().fetch_add(4, Ordering::Relaxed);
        assert!(m.render_prometheus().contains("fitola_memory_writes_total 4"));
    }

    #[test]
    fn test_metrics_prometheus_format() {
        let output = Metrics::new().render_prometheus();
        assert!(output.contains("# HELP fitola_uptime_seconds"));
        assert!(output.contains("# TYPE fitola_uptime_seconds gauge"));
        assert!(output.contains("# TYPE fitola_llm_errors_total counter"));
    }
}
