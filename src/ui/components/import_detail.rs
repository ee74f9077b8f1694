use crate::models::{Import, ImportFileInfo};
use crate::ui::app_context::use_app_context;
use crate::ui::components::file_actions::save_stored_file;
use crate::ui::components::{EmptyState, Loading, StatusBadge};
use crate::ui::toast_context::use_toast;
use crate::ui::Route;
use dioxus::prelude::*;

/// Detail page for a single import record and its stored file
#[component]
pub fn ImportDetail(id: String) -> Element {
    let app = use_app_context();
    let toasts = use_toast();
    let mut record = use_signal(|| None::<Import>);
    let mut file = use_signal(|| None::<ImportFileInfo>);
    let mut loading = use_signal(|| true);

    use_effect({
        let app = app.clone();
        let id = id.clone();
        move || {
            let gateway = app.gateway.clone();
            let id = id.clone();
            spawn(async move {
                let found = gateway.get_by_id(&id).await;
                if found.is_some() {
                    file.set(gateway.file_info(&id).await);
                }
                record.set(found);
                loading.set(false);
            });
        }
    });

    rsx! {
        if loading() {
            Loading { message: "Loading import..." }
        } else if let Some(import) = record() {
            div { class: "flex flex-col gap-4 max-w-2xl",
                div { class: "flex items-center justify-between",
                    h1 { class: "text-2xl font-bold", "{import.name}" }
                    Link {
                        to: Route::Imports {},
                        class: "text-blue-600 hover:underline text-sm",
                        "Back to imports"
                    }
                }

                div { class: "bg-white border border-gray-200 rounded-md divide-y divide-gray-100",
                    DetailRow { label: "Identifier", value: import.id.clone() }
                    DetailRow { label: "Type", value: import.import_type.to_string() }
                    div { class: "flex items-center justify-between px-4 py-3",
                        span { class: "text-gray-500 text-sm", "Status" }
                        StatusBadge { status: import.status }
                    }
                    DetailRow { label: "Progress", value: "{import.progress_display()}%" }
                    DetailRow { label: "Created", value: import.created_label() }
                    DetailRow { label: "Updated", value: import.updated_label() }
                }

                FileSection { import_id: import.id.clone(), file: file() }
            }
        } else {
            EmptyState {
                title: "Import not found",
                message: "This import does not exist or was deleted.",
                Link {
                    to: Route::Imports {},
                    class: "inline-block bg-blue-600 hover:bg-blue-700 text-white font-medium py-2 px-4 rounded",
                    "Back to imports"
                }
            }
        }
    }
}

#[component]
fn DetailRow(label: String, value: String) -> Element {
    rsx! {
        div { class: "flex items-center justify-between px-4 py-3",
            span { class: "text-gray-500 text-sm", "{label}" }
            span { class: "text-sm text-gray-800", "{value}" }
        }
    }
}

#[component]
fn FileSection(import_id: String, file: Option<ImportFileInfo>) -> Element {
    let app = use_app_context();
    let toasts = use_toast();

    rsx! {
        div { class: "bg-white border border-gray-200 rounded-md p-4",
            h2 { class: "text-sm font-semibold text-gray-700 mb-2", "Stored file" }
            if let Some(info) = file {
                div { class: "flex items-center justify-between",
                    div { class: "flex flex-col",
                        span { class: "text-sm text-gray-800", "{info.name}" }
                        if let Some(size) = info.size {
                            span { class: "text-xs text-gray-500", {format_size(size)} }
                        }
                    }
                    button {
                        class: "px-3 py-1 text-sm border border-gray-300 rounded hover:bg-gray-100",
                        onclick: {
                            let import_id = import_id.clone();
                            move |_| {
                                let gateway = app.gateway.clone();
                                let import_id = import_id.clone();
                                spawn(async move {
                                    save_stored_file(gateway, toasts, import_id).await;
                                });
                            }
                        },
                        "Download"
                    }
                }
            } else {
                p { class: "text-sm text-gray-500", "No file is stored for this import." }
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
