use crate::backend::ImportsGateway;
use crate::export::{build_csv, export_file_name};
use crate::listing::{last_page, PageKey, PageLoader, PageOutcome};
use crate::models::{Import, StatusFilter};
use crate::ui::app_context::use_app_context;
use crate::ui::toast_context::{use_toast, ToastContext};
use chrono::Utc;
use dioxus::prelude::*;
use rfd::AsyncFileDialog;
use std::time::Duration;
use tracing::debug;

/// Quiet period before keystrokes commit to the effective search
const SEARCH_DEBOUNCE_MS: u64 = 300;

/// State and behavior behind the imports listing: filter, debounced search,
/// page index, the visible rows, and the page loader that caches and
/// sequences fetches.
#[derive(Clone)]
pub struct ImportsContext {
    pub filter: Signal<StatusFilter>,
    /// Raw keystrokes, committed to `search` after the quiet period
    pub search_input: Signal<String>,
    /// Effective search text driving the listing
    pub search: Signal<String>,
    pub page: Signal<u32>,
    pub rows: Signal<Vec<Import>>,
    pub total: Signal<u64>,
    pub loading: Signal<bool>,
    debounce_gen: Signal<u64>,
    loader: PageLoader<ImportsGateway>,
    gateway: ImportsGateway,
    toasts: ToastContext,
}

impl ImportsContext {
    pub fn new(gateway: ImportsGateway, toasts: ToastContext) -> Self {
        Self {
            filter: Signal::new(StatusFilter::All),
            search_input: Signal::new(String::new()),
            search: Signal::new(String::new()),
            page: Signal::new(1),
            rows: Signal::new(Vec::new()),
            total: Signal::new(0),
            loading: Signal::new(true),
            debounce_gen: Signal::new(0),
            loader: PageLoader::new(gateway.clone()),
            gateway,
            toasts,
        }
    }

    /// Load the page for the current filter/search/page. Cache hits resolve
    /// without a network call; superseded responses are dropped unseen.
    pub fn spawn_load(&self) {
        let ctx = self.clone();
        spawn(async move {
            let search = ctx.search.peek().clone();
            let key = PageKey::new(*ctx.filter.peek(), &search, *ctx.page.peek());

            let mut loading = ctx.loading;
            let mut rows = ctx.rows;
            let mut total = ctx.total;

            loading.set(true);
            match ctx.loader.load_page(key).await {
                PageOutcome::Loaded(view) => {
                    rows.set(view.items);
                    total.set(view.total);
                    loading.set(false);
                }
                PageOutcome::Superseded => {}
                PageOutcome::Failed => {
                    rows.set(Vec::new());
                    total.set(0);
                    loading.set(false);
                    ctx.toasts.alert("Failed to load imports");
                }
            }
        });
    }

    pub fn set_filter(&self, filter: StatusFilter) {
        if *self.filter.peek() == filter {
            return;
        }
        let mut filter_signal = self.filter;
        let mut page = self.page;
        filter_signal.set(filter);
        page.set(1);
    }

    /// Buffer a keystroke; the effective search only changes after the
    /// quiet period, and a committed change resets to page 1
    pub fn set_search_input(&self, text: String) {
        let mut search_input = self.search_input;
        search_input.set(text);

        let mut debounce_gen = self.debounce_gen;
        let generation = *debounce_gen.peek() + 1;
        debounce_gen.set(generation);

        let ctx = self.clone();
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(SEARCH_DEBOUNCE_MS)).await;
            if *ctx.debounce_gen.peek() != generation {
                return;
            }

            let committed = ctx.search_input.peek().clone();
            if *ctx.search.peek() != committed {
                debug!("Committing search '{}'", committed);
                let mut search = ctx.search;
                let mut page = ctx.page;
                search.set(committed);
                page.set(1);
            }
        });
    }

    pub fn prev_page(&self) {
        let mut page = self.page;
        let current = *page.peek();
        if current > 1 {
            page.set(current - 1);
        }
    }

    pub fn next_page(&self) {
        let mut page = self.page;
        let current = *page.peek();
        if current < last_page(*self.total.peek()) {
            page.set(current + 1);
        }
    }

    /// The record count changed underneath the cache (a record was created):
    /// drop everything and reload from page 1
    pub fn record_created(&self) {
        self.loader.invalidate();
        let mut page = self.page;
        if *page.peek() != 1 {
            page.set(1);
        } else {
            self.spawn_load();
        }
    }

    /// Delete through the gateway, then patch the visible page without
    /// waiting for a reload. Delete failures are surfaced; read paths never
    /// are.
    pub fn delete_row(&self, id: String) {
        let ctx = self.clone();
        spawn(async move {
            match ctx.gateway.delete(&id).await {
                Ok(()) => {
                    let current_rows = ctx.rows.peek().clone();
                    let view = ctx.loader.remove_from_view(
                        &current_rows,
                        *ctx.total.peek(),
                        *ctx.page.peek(),
                        &id,
                    );

                    let mut rows = ctx.rows;
                    let mut total = ctx.total;
                    let mut page = ctx.page;
                    rows.set(view.items);
                    total.set(view.total);
                    if *page.peek() != view.page {
                        page.set(view.page);
                    }
                    ctx.toasts.info("Import deleted");
                }
                Err(e) => ctx.toasts.alert(format!("Failed to delete import: {}", e)),
            }
        });
    }

    /// Export the whole filtered set (not just the visible page) as CSV
    pub fn export_all(&self) {
        let ctx = self.clone();
        spawn(async move {
            let status = *ctx.filter.peek();
            let search = ctx.search.peek().clone();

            match ctx.loader.collect_all(status, &search).await {
                Ok(items) => {
                    let csv = build_csv(&items);
                    let file_name = export_file_name(Utc::now());

                    if let Some(handle) = AsyncFileDialog::new()
                        .set_title("Save imports export")
                        .set_file_name(&file_name)
                        .save_file()
                        .await
                    {
                        match tokio::fs::write(handle.path(), csv.as_bytes()).await {
                            Ok(()) => {
                                ctx.toasts.info(format!("Exported {} import(s)", items.len()))
                            }
                            Err(e) => ctx.toasts.alert(format!("Failed to write CSV: {}", e)),
                        }
                    }
                }
                Err(e) => ctx
                    .toasts
                    .alert(format!("Failed to collect imports for export: {}", e)),
            }
        });
    }
}

/// Provider component scoping the listing state to the imports screen
#[component]
pub fn ImportsContextProvider(children: Element) -> Element {
    let app = use_app_context();
    let toasts = use_toast();
    let ctx = use_context_provider(|| ImportsContext::new(app.gateway.clone(), toasts));

    // Reload whenever the filter, the effective search or the page changes
    use_effect(move || {
        let _ = (ctx.filter)();
        let _ = (ctx.search)();
        let _ = (ctx.page)();
        ctx.spawn_load();
    });

    rsx! {
        {children}
    }
}

/// Hook to access the imports listing context
pub fn use_imports_context() -> ImportsContext {
    use_context::<ImportsContext>()
}
