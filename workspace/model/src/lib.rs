pub mod entities;

// Re-export tracing for use in this crate
pub use tracing;

/// Install a stdout tracing subscriber.
///
/// The filter is read from `RUST_LOG` and falls back to `default_filter`
/// when the variable is unset or invalid.
#[cfg(not(test))]
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
