use crate::models::{Import, ImportStatus};
use crate::ui::app_context::use_app_context;
use crate::ui::components::{EmptyState, Loading};
use crate::ui::components::status_badge::status_color;
use crate::ui::Route;
use dioxus::prelude::*;

/// Dashboard page: summary cards over the whole collection
#[component]
pub fn Dashboard() -> Element {
    let app = use_app_context();
    let mut imports = use_signal(Vec::<Import>::new);
    let mut loading = use_signal(|| true);

    use_effect(move || {
        let gateway = app.gateway.clone();
        spawn(async move {
            let list = gateway.list_all().await;
            imports.set(list);
            loading.set(false);
        });
    });

    let list = imports();
    let count_for =
        |status: ImportStatus| list.iter().filter(|i| i.status == status).count() as u64;

    rsx! {
        h1 { class: "text-2xl font-bold mb-6", "Dashboard" }

        if loading() {
            Loading { message: "Loading imports..." }
        } else if list.is_empty() {
            EmptyState {
                title: "No imports yet",
                message: "Create your first import to see activity here.",
                Link {
                    to: Route::Imports {},
                    class: "inline-block bg-blue-600 hover:bg-blue-700 text-white font-medium py-2 px-4 rounded",
                    "Go to imports"
                }
            }
        } else {
            div { class: "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4",
                SummaryCard { label: "Total", value: list.len() as u64, color: "transparent" }
                SummaryCard {
                    label: "Completed",
                    value: count_for(ImportStatus::Completed),
                    color: status_color(ImportStatus::Completed).to_string(),
                }
                SummaryCard {
                    label: "Pending",
                    value: count_for(ImportStatus::Pending),
                    color: status_color(ImportStatus::Pending).to_string(),
                }
                SummaryCard {
                    label: "Failed",
                    value: count_for(ImportStatus::Failed),
                    color: status_color(ImportStatus::Failed).to_string(),
                }
            }

            RecentImports { imports: list.iter().take(5).cloned().collect::<Vec<_>>() }
        }
    }
}

#[component]
fn SummaryCard(label: String, value: u64, color: String) -> Element {
    rsx! {
        div { class: "bg-white border border-gray-200 rounded-md p-4",
            div { class: "flex items-center justify-between",
                span { class: "text-gray-500 text-sm", "{label}" }
                span {
                    class: "w-3 h-3 rounded-full",
                    style: "background-color: {color}",
                }
            }
            div { class: "text-3xl font-bold mt-2", "{value}" }
        }
    }
}

/// The five most recently updated imports, linking into the detail view
#[component]
fn RecentImports(imports: Vec<Import>) -> Element {
    rsx! {
        div { class: "mt-8",
            h2 { class: "text-lg font-semibold mb-3", "Recently updated" }
            div { class: "bg-white border border-gray-200 rounded-md divide-y divide-gray-100",
                for import in imports {
                    Link {
                        key: "{import.id}",
                        to: Route::ImportDetail { id: import.id.clone() },
                        class: "flex items-center justify-between px-4 py-3 hover:bg-gray-50",
                        span { class: "text-sm font-medium text-gray-800", "{import.name}" }
                        span { class: "text-xs text-gray-500", "{import.updated_label()}" }
                    }
                }
            }
        }
    }
}
