const DEFAULT_LOG_FILTER: &str = "error,ui=debug,action_runner=debug";
const DEFAULT_DEMO_LATENCY_MS: u32 = 800;

/// Log filter directives, set at build time with UI_LOG_FILTER.
pub fn log_filter() -> &'static str {
    option_env!("UI_LOG_FILTER").unwrap_or(DEFAULT_LOG_FILTER)
}

/// Simulated round-trip time of the demo action, set at build time with
/// DEMO_LATENCY_MS.
pub fn demo_latency_ms() -> u32 {
    option_env!("DEMO_LATENCY_MS")
        .and_then(|ms| ms.parse().ok())
        .unwrap_or(DEFAULT_DEMO_LATENCY_MS)
}
