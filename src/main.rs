use tracing_subscriber::EnvFilter;

fn main() {
    // .env first, so everything downstream sees the overrides. Running
    // without one is the normal case outside dev checkouts.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dioxus::launch(truffle::ui::App);
}
