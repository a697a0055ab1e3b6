use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coursechat=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    // Before tracing, so RUST_LOG can come from the env files.
    let loaded = coursechat::config::load_env_files();
    init_tracing();
    if let Err(err) = loaded {
        tracing::warn!("environment files not loaded: {err:#}");
    }
    dioxus::launch(coursechat::ui::App);
}
