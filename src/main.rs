use excelsior::GlobeConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "excelsior=info".into()),
        )
        .init();

    tracing::info!("Excelsior v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = excelsior::run(GlobeConfig::default()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
    tracing::info!("shutdown complete");
}
