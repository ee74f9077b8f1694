pub mod app;
pub mod app_context;
pub mod components;
pub mod imports_context;
pub mod toast_context;

pub use app::{make_config, App, Route};
pub use app_context::{use_app_context, AppContext};
