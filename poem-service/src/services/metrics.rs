//! Prometheus metrics for poem-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub static POEM_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_TOKENS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static GENAI_PROVIDER_LATENCY_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static GENAI_PROVIDER_ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once; only the first call
/// registers anything.
pub fn init_metrics() {
    if REGISTRY.get().is_some() {
        return;
    }

    let registry = Registry::new();

    let poem_requests = match IntCounterVec::new(
        Opts::new("poem_requests_total", "Total poem generation requests"),
        &["outcome"],
    ) {
        Ok(m) => m,
        Err(e) => return metric_setup_failed("poem_requests_total", e),
    };

    // type: input, output
    let tokens = match IntCounterVec::new(
        Opts::new("genai_tokens_total", "Total tokens processed"),
        &["model", "type"],
    ) {
        Ok(m) => m,
        Err(e) => return metric_setup_failed("genai_tokens_total", e),
    };

    let provider_latency = match HistogramVec::new(
        HistogramOpts::new(
            "genai_provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        &["provider", "model"],
    ) {
        Ok(m) => m,
        Err(e) => return metric_setup_failed("genai_provider_latency_seconds", e),
    };

    let provider_errors = match IntCounterVec::new(
        Opts::new("genai_provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    ) {
        Ok(m) => m,
        Err(e) => return metric_setup_failed("genai_provider_errors_total", e),
    };

    let registered = registry
        .register(Box::new(poem_requests.clone()))
        .and_then(|_| registry.register(Box::new(tokens.clone())))
        .and_then(|_| registry.register(Box::new(provider_latency.clone())))
        .and_then(|_| registry.register(Box::new(provider_errors.clone())));
    if let Err(e) = registered {
        return metric_setup_failed("registry", e);
    }

    let _ = REGISTRY.set(registry);
    let _ = POEM_REQUESTS_TOTAL.set(poem_requests);
    let _ = GENAI_TOKENS_TOTAL.set(tokens);
    let _ = GENAI_PROVIDER_LATENCY_SECONDS.set(provider_latency);
    let _ = GENAI_PROVIDER_ERRORS_TOTAL.set(provider_errors);

    tracing::info!("Prometheus metrics initialized");
}

fn metric_setup_failed(name: &str, error: prometheus::Error) {
    tracing::error!(metric = name, error = %error, "Failed to initialize metric");
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record the outcome of a poem request ("ok" or an error kind).
pub fn record_poem_request(outcome: &str) {
    if let Some(counter) = POEM_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_tokens(model: &str, input_tokens: i32, output_tokens: i32) {
    if let Some(counter) = GENAI_TOKENS_TOTAL.get() {
        counter
            .with_label_values(&[model, "input"])
            .inc_by(input_tokens.max(0) as u64);
        counter
            .with_label_values(&[model, "output"])
            .inc_by(output_tokens.max(0) as u64);
    }
}

pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(histogram) = GENAI_PROVIDER_LATENCY_SECONDS.get() {
        histogram
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(counter) = GENAI_PROVIDER_ERRORS_TOTAL.get() {
        counter.with_label_values(&[provider, error_type]).inc();
    }
}
