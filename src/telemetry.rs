//! Telemetry helpers for applications embedding `strategy-chart`.
//!
//! Chart composition reports stage transitions at `debug` and per-artifact
//! color/z-order decisions at `trace`. Subscriber setup stays opt-in: call one
//! of the helpers below or install your own subscriber.

/// Installs a compact subscriber filtered by `RUST_LOG`, falling back to `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Same as [`init_default_tracing`] with caller-provided fallback directives,
/// e.g. `"strategy_chart=trace"` to inspect z-order and color assignment.
#[must_use]
pub fn init_tracing_with_filter(fallback_directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directives));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directives;
        false
    }
}
