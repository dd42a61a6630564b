use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `tracing` subscriber for the CLI.
///
/// `RUST_LOG` wins when set; otherwise `verbose` raises this crate's level from info upward.
pub fn init(verbose: u8) {
    let fallback = match verbose {
        0 => "destiny_card=info",
        1 => "destiny_card=debug",
        _ => "destiny_card=trace",
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
