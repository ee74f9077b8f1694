use dioxus::desktop::{Config as DioxusConfig, WindowBuilder};
use dioxus::prelude::*;

use crate::ui::app_context::AppContext;
use crate::ui::components::{Dashboard, ImportDetail, Imports, Navbar};
use crate::ui::toast_context::ToastProvider;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Navbar)]
    #[route("/")]
    Dashboard {},
    #[route("/imports")]
    Imports {},
    #[route("/imports/:id")]
    ImportDetail { id: String },
}

pub fn make_config() -> DioxusConfig {
    DioxusConfig::default().with_window(make_window())
}

fn make_window() -> WindowBuilder {
    WindowBuilder::new()
        .with_title("intake")
        .with_always_on_top(false)
        .with_inner_size(dioxus::desktop::LogicalSize::new(1200, 800))
}

#[component]
pub fn App() -> Element {
    use_context_provider(AppContext::new);

    rsx! {
        ToastProvider {
            Router::<Route> {}
        }
    }
}
