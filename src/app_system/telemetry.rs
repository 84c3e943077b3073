/// Centralized tracing setup for the whole application.
///
/// Verbosity comes from `RUST_LOG` (default `info`). Logs go to stderr so they
/// do not interleave with the console's own output on stdout.
///
/// ```bash
/// RUST_LOG=debug product_console
/// RUST_LOG=product_console::clients=debug,info product_console
/// ```
pub fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
