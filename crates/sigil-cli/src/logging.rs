use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber.
///
/// Without `-v` the filter comes from `RUST_LOG`, falling back to `warn`;
/// `-v` forces `info` and `-vv` forces `debug`.
pub fn init_tracing(verbosity: u8) {
    let env_filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .unwrap_or_else(|e| eprintln!("Failed to initialize logging: {e}"));
}
