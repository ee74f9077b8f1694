use crate::backend::ImportsGateway;
use crate::config::Config;
use dioxus::prelude::*;

/// Application-wide services, provided once at the root
#[derive(Clone)]
pub struct AppContext {
    pub gateway: ImportsGateway,
    pub config: Config,
}

impl AppContext {
    pub fn new() -> Self {
        let config = Config::load();
        let gateway = ImportsGateway::new(&config);
        Self { gateway, config }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook to access the application context
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>()
}
