//! Standard tracing subscriber setup for CLI binaries.

/// Initialize a tracing subscriber with env-based filtering, writing to stderr.
///
/// Default directives:
/// - `llm_observe=info`
/// - `reqwest=warn`
/// - `hyper_util=warn`
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("llm_observe=info".parse().unwrap_or_default())
        .add_directive("reqwest=warn".parse().unwrap_or_default())
        .add_directive("hyper_util=warn".parse().unwrap_or_default());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
