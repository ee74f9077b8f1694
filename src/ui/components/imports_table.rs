use crate::listing::last_page;
use crate::models::Import;
use crate::ui::app_context::use_app_context;
use crate::ui::components::file_actions::save_stored_file;
use crate::ui::components::StatusBadge;
use crate::ui::imports_context::use_imports_context;
use crate::ui::toast_context::use_toast;
use crate::ui::Route;
use dioxus::prelude::*;

/// The paged listing table with per-row actions and the pager
#[component]
pub fn ImportsTable() -> Element {
    let ctx = use_imports_context();

    let rows = (ctx.rows)();
    let total = (ctx.total)();
    let page = (ctx.page)();
    let last = last_page(total);

    rsx! {
        div { class: "flex flex-col border border-gray-200 rounded-md bg-white",
            div { class: "flex w-full text-gray-500 text-sm border-b border-gray-200 p-4",
                span { class: "w-[25%]", "Name" }
                span { class: "w-[15%]", "Status" }
                span { class: "w-[15%]", "Progress" }
                span { class: "w-[25%]", "Updated" }
                span { class: "w-[20%]", "Actions" }
            }

            for import in rows {
                ImportRow { key: "{import.id}", import }
            }

            div { class: "flex items-center justify-between px-4 py-3 text-sm text-gray-600",
                span { "Page {page} of {last} - {total} import(s)" }
                div { class: "flex gap-2",
                    button {
                        class: "px-3 py-1 border border-gray-300 rounded disabled:opacity-50",
                        disabled: page <= 1,
                        onclick: {
                            let ctx = ctx.clone();
                            move |_| ctx.prev_page()
                        },
                        "Previous"
                    }
                    button {
                        class: "px-3 py-1 border border-gray-300 rounded disabled:opacity-50",
                        disabled: page >= last,
                        onclick: {
                            let ctx = ctx.clone();
                            move |_| ctx.next_page()
                        },
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
fn ImportRow(import: Import) -> Element {
    let ctx = use_imports_context();
    let app = use_app_context();
    let toasts = use_toast();

    rsx! {
        div { class: "flex w-full items-center text-sm border-b border-gray-100 px-4 py-2",
            span { class: "w-[25%]",
                Link {
                    to: Route::ImportDetail { id: import.id.clone() },
                    class: "text-blue-600 hover:underline",
                    "{import.name}"
                }
            }
            span { class: "w-[15%]",
                StatusBadge { status: import.status }
            }
            span { class: "w-[15%]", "{import.progress_display()}%" }
            span { class: "w-[25%]", "{import.updated_label()}" }
            span { class: "w-[20%] flex gap-2",
                button {
                    class: "px-2 py-1 text-xs border border-gray-300 rounded hover:bg-gray-100",
                    onclick: {
                        let id = import.id.clone();
                        move |_| {
                            let gateway = app.gateway.clone();
                            let id = id.clone();
                            spawn(async move {
                                save_stored_file(gateway, toasts, id).await;
                            });
                        }
                    },
                    "Download"
                }
                button {
                    class: "px-2 py-1 text-xs border border-red-300 text-red-700 rounded hover:bg-red-50",
                    onclick: {
                        let ctx = ctx.clone();
                        let id = import.id.clone();
                        move |_| ctx.delete_row(id.clone())
                    },
                    "Delete"
                }
            }
        }
    }
}
