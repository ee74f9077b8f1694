use crate::backend::LocalModeReason;
use crate::ui::app_context::use_app_context;
use crate::ui::toast_context::use_toast;
use crate::ui::Route;
use dioxus::prelude::*;

/// Shared navbar layout wrapping every page
#[component]
pub fn Navbar() -> Element {
    rsx! {
        div { class: "min-h-screen bg-gray-50",
            div { class: "bg-gray-800 text-white p-4 flex items-center space-x-6",
                span { class: "font-bold text-lg", "intake" }
                Link {
                    to: Route::Dashboard {},
                    class: "hover:text-blue-300 transition-colors",
                    "Dashboard"
                }
                Link {
                    to: Route::Imports {},
                    class: "hover:text-blue-300 transition-colors",
                    "Imports"
                }
            }

            LocalModeBanner {}

            div { class: "container mx-auto p-6",
                Outlet::<Route> {}
            }
        }
    }
}

/// Watches the gateway's local-mode channel; the first notice of the session
/// raises a toast and keeps an informational banner visible.
#[component]
fn LocalModeBanner() -> Element {
    let app = use_app_context();
    let toasts = use_toast();
    let mut reason = use_signal(|| None::<LocalModeReason>);

    use_effect(move || {
        let gateway = app.gateway.clone();
        spawn(async move {
            let mut rx = gateway.local_mode();
            loop {
                let current = *rx.borrow_and_update();
                if let Some(r) = current {
                    reason.set(Some(r));
                    toasts.info(match r {
                        LocalModeReason::MissingConfig => {
                            "No backend configured - imports are stored on this machine only"
                        }
                        LocalModeReason::RemoteError => {
                            "Backend unreachable - showing locally stored imports"
                        }
                    });
                    break;
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
    });

    rsx! {
        if reason().is_some() {
            div { class: "bg-amber-100 border-b border-amber-300 text-amber-900 px-6 py-2 text-sm",
                "Working in local mode. Records are kept on this machine only."
            }
        }
    }
}
