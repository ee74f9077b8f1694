use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,intake=debug")),
        )
        .init();

    dioxus::LaunchBuilder::new()
        .with_cfg(intake::ui::make_config())
        .launch(intake::ui::App);
}
