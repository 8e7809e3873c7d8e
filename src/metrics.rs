//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts, Registry};

/// Registry shared between the middleware and the custom counters.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Simulation runs by outcome (`ok` / `error`).
pub static SIMULATION_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("simulation_runs_total", "Simulation runs by outcome."),
        &["outcome"],
    )
    .expect("simulation counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("register simulation counter");
    counter
});

/// Global Prometheus handle reused in tests.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("game_stats")
        .registry(REGISTRY.clone())
        .endpoint("/metrics") // exposed URL
        .build()
        .expect("metrics builder")
});
