use crate::models::ImportStatus;
use dioxus::prelude::*;

/// Badge background per status
pub fn status_color(status: ImportStatus) -> &'static str {
    match status {
        ImportStatus::Completed => "#D1FAE5",
        ImportStatus::Pending => "#FEF3C7",
        ImportStatus::Failed => "#FEE2E2",
    }
}

#[component]
pub fn StatusBadge(status: ImportStatus) -> Element {
    let color = status_color(status);

    rsx! {
        span {
            class: "inline-flex rounded-md px-3 py-1 text-xs font-medium text-gray-800",
            style: "background-color: {color}",
            "{status}"
        }
    }
}
