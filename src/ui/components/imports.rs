use crate::models::StatusFilter;
use crate::ui::components::imports_table::ImportsTable;
use crate::ui::components::new_import::NewImport;
use crate::ui::components::{EmptyState, Loading};
use crate::ui::imports_context::{use_imports_context, ImportsContextProvider};
use dioxus::prelude::*;

/// Imports page: filterable, searchable, paged listing plus creation and
/// export entry points
#[component]
pub fn Imports() -> Element {
    rsx! {
        ImportsContextProvider {
            ImportsView {}
        }
    }
}

#[component]
fn ImportsView() -> Element {
    let ctx = use_imports_context();
    let mut show_new = use_signal(|| false);

    let rows = (ctx.rows)();
    let total = (ctx.total)();
    let loading = (ctx.loading)();
    let filter = (ctx.filter)();
    let search_input = (ctx.search_input)();

    rsx! {
        div { class: "flex flex-col gap-4",
            div { class: "flex flex-col gap-3 sm:flex-row sm:items-center sm:justify-between",
                h1 { class: "text-2xl font-bold", "Imports" }
                div { class: "flex gap-2",
                    button {
                        class: "bg-white border border-gray-300 hover:bg-gray-100 text-gray-800 font-medium py-2 px-4 rounded disabled:opacity-50",
                        disabled: total == 0,
                        onclick: {
                            let ctx = ctx.clone();
                            move |_| ctx.export_all()
                        },
                        "Export CSV"
                    }
                    button {
                        class: "bg-blue-600 hover:bg-blue-700 text-white font-medium py-2 px-4 rounded",
                        onclick: move |_| show_new.set(true),
                        "New import"
                    }
                }
            }

            div { class: "flex flex-col gap-3 sm:flex-row sm:items-center",
                select {
                    class: "px-3 py-2 border border-gray-300 rounded-md bg-white",
                    onchange: {
                        let ctx = ctx.clone();
                        move |evt: FormEvent| ctx.set_filter(StatusFilter::from_key(&evt.value()))
                    },
                    for option_filter in StatusFilter::ALL {
                        option {
                            value: option_filter.as_str(),
                            selected: option_filter == filter,
                            {filter_label(option_filter)}
                        }
                    }
                }
                input {
                    class: "flex-1 px-3 py-2 border border-gray-300 rounded-md",
                    placeholder: "Search by name or id",
                    value: "{search_input}",
                    oninput: {
                        let ctx = ctx.clone();
                        move |evt: FormEvent| ctx.set_search_input(evt.value())
                    },
                }
            }

            if loading && rows.is_empty() {
                Loading { message: "Loading imports..." }
            } else if rows.is_empty() {
                EmptyState {
                    title: "No imports found",
                    message: "Nothing matches the current filter and search.",
                    button {
                        class: "bg-blue-600 hover:bg-blue-700 text-white font-medium py-2 px-4 rounded",
                        onclick: move |_| show_new.set(true),
                        "New import"
                    }
                }
            } else {
                ImportsTable {}
            }
        }

        if show_new() {
            NewImport {
                on_close: move |_| show_new.set(false),
                on_created: {
                    let ctx = ctx.clone();
                    move |_| ctx.record_created()
                },
            }
        }
    }
}

fn filter_label(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "All statuses",
        StatusFilter::Only(status) => match status {
            crate::models::ImportStatus::Completed => "Completed",
            crate::models::ImportStatus::Pending => "Pending",
            crate::models::ImportStatus::Failed => "Failed",
        },
    }
}
