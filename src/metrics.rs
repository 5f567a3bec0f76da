use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally. Used where
/// a process may build several states, such as tests.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}

fn register_metrics() {
    // Pre-register counters so they appear even before the first increment.
    counter!("analysis_requests_total").absolute(0);
    counter!("analysis_rows_total").absolute(0);
    counter!("analysis_crops_skipped_total").absolute(0);
    counter!("analysis_default_prices_total").absolute(0);
    counter!("opportunity_scans_total").absolute(0);
    counter!("markets_confirmed_total").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("analysis_latency_seconds").record(0.0);
}
