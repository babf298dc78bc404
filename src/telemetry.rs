use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Compact stderr logging filtered by `RUST_LOG`, `info` when unset.
pub fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
