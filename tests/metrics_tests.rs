use game_stats_server::metrics::{REGISTRY, SIMULATION_RUNS};
use prometheus::{Encoder, TextEncoder};

#[test]
fn simulation_run_counter_counts_by_outcome() {
    let before = SIMULATION_RUNS.with_label_values(&["ok"]).get();
    SIMULATION_RUNS.with_label_values(&["ok"]).inc();
    SIMULATION_RUNS.with_label_values(&["error"]).inc();
    assert_eq!(SIMULATION_RUNS.with_label_values(&["ok"]).get(), before + 1);
    assert!(SIMULATION_RUNS.with_label_values(&["error"]).get() >= 1);
}

#[test]
fn simulation_run_counter_is_registered() {
    // Touch the counter so the lazy registration has happened.
    SIMULATION_RUNS.with_label_values(&["ok"]).get();

    let mut buf = Vec::new();
    TextEncoder::new()
        .encode(&REGISTRY.gather(), &mut buf)
        .unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("simulation_runs_total"));
}
