use crate::backend::{GatewayError, ImportsGateway};
use crate::models::{Import, ImportPage, StatusFilter};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Rows per listing page
pub const PAGE_SIZE: usize = 5;

/// Concurrent page fetches during an export collection
const EXPORT_FETCH_CONCURRENCY: usize = 4;

/// Identity of one cached page: status filter, normalized search text and
/// 1-based page number
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub status: StatusFilter,
    pub search: String,
    pub page: u32,
}

impl PageKey {
    pub fn new(status: StatusFilter, raw_search: &str, page: u32) -> Self {
        Self {
            status,
            search: normalize_search(raw_search),
            page,
        }
    }

    fn filter_key(&self) -> (StatusFilter, String) {
        (self.status, self.search.clone())
    }

    fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * PAGE_SIZE
    }
}

/// Search text as it participates in cache identity and matching
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Number of pages implied by a filter-wide total
pub fn page_count(total: u64) -> u32 {
    total.div_ceil(PAGE_SIZE as u64) as u32
}

/// Last valid page index; an empty collection still has page 1
pub fn last_page(total: u64) -> u32 {
    page_count(total).max(1)
}

/// Something that can answer paged listing queries. Implemented by the
/// gateway; tests substitute instrumented sources.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
        status: StatusFilter,
        search: &str,
    ) -> Result<ImportPage, GatewayError>;
}

#[async_trait]
impl PageSource for ImportsGateway {
    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
        status: StatusFilter,
        search: &str,
    ) -> Result<ImportPage, GatewayError> {
        Ok(self.list_page(limit, offset, status, search).await)
    }
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
        status: StatusFilter,
        search: &str,
    ) -> Result<ImportPage, GatewayError> {
        (**self).fetch_page(limit, offset, status, search).await
    }
}

/// One page as handed to the view
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub items: Vec<Import>,
    pub total: u64,
}

/// Result of a page load
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Page is current; show it
    Loaded(PageView),
    /// A newer request took over while this one was in flight; drop the
    /// result without touching any state
    Superseded,
    /// The load failed and is still current; show an empty page rather than
    /// stale rows next to an error
    Failed,
}

/// Visible state after optimistically removing a record
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalView {
    pub items: Vec<Import>,
    pub total: u64,
    pub page: u32,
}

#[derive(Default)]
struct LoaderState {
    pages: HashMap<PageKey, Vec<Import>>,
    totals: HashMap<(StatusFilter, String), u64>,
}

/// Page cache plus request sequencing for the imports listing.
///
/// Pages are cached per (status, search, page); totals per (status, search),
/// since the count does not vary across pages of one filter set. A
/// monotonically increasing sequence number makes the latest request the
/// only one allowed to publish its result.
#[derive(Clone)]
pub struct PageLoader<S> {
    source: S,
    state: Arc<Mutex<LoaderState>>,
    seq: Arc<AtomicU64>,
}

impl<S: PageSource> PageLoader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(LoaderState::default())),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoaderState> {
        self.state.lock().expect("listing state poisoned")
    }

    /// Load one page. Every call begins a new request generation, so a call
    /// that resolves after a newer one reports `Superseded` and must not be
    /// applied.
    pub async fn load_page(&self, key: PageKey) -> PageOutcome {
        let token = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let state = self.lock();
            if let Some(items) = state.pages.get(&key) {
                let total = state
                    .totals
                    .get(&key.filter_key())
                    .copied()
                    .unwrap_or(items.len() as u64);
                debug!("Page cache hit for {:?}", key);
                return PageOutcome::Loaded(PageView {
                    items: items.clone(),
                    total,
                });
            }
        }

        debug!("Page cache miss for {:?}", key);
        let result = self
            .source
            .fetch_page(PAGE_SIZE, key.offset(), key.status, &key.search)
            .await;

        if self.seq.load(Ordering::SeqCst) != token {
            debug!("Discarding superseded page load for {:?}", key);
            return PageOutcome::Superseded;
        }

        match result {
            Ok(page) => {
                let view = PageView {
                    items: page.items.clone(),
                    total: page.total,
                };
                let mut state = self.lock();
                state.totals.insert(key.filter_key(), page.total);
                state.pages.insert(key, page.items);
                PageOutcome::Loaded(view)
            }
            Err(e) => {
                warn!("Page load failed: {}", e);
                PageOutcome::Failed
            }
        }
    }

    /// Drop every cached page and total. Called whenever the globally
    /// tracked record count changes, since an insertion can shift the
    /// contents of every page.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.pages.clear();
        state.totals.clear();
    }

    /// Optimistically remove a deleted record from the visible page:
    /// patch the rows, decrement the total, clamp the page index to the new
    /// last page, and drop the cache so the next navigation refetches
    /// instead of trusting the patch.
    pub fn remove_from_view(
        &self,
        items: &[Import],
        total: u64,
        page: u32,
        id: &str,
    ) -> RemovalView {
        let items: Vec<Import> = items.iter().filter(|i| i.id != id).cloned().collect();
        let total = total.saturating_sub(1);
        let page = page.min(last_page(total));

        self.invalidate();

        RemovalView { items, total, page }
    }

    /// Collect the entire filtered set in page order, fetching only the
    /// pages missing from cache (concurrently, bounded).
    pub async fn collect_all(
        &self,
        status: StatusFilter,
        raw_search: &str,
    ) -> Result<Vec<Import>, GatewayError> {
        let search = normalize_search(raw_search);
        let filter_key = (status, search.clone());

        let known_total = self.lock().totals.get(&filter_key).copied();
        let total = match known_total {
            Some(total) => total,
            None => {
                let first = self.source.fetch_page(PAGE_SIZE, 0, status, &search).await?;
                let total = first.total;
                let mut state = self.lock();
                state.totals.insert(filter_key, total);
                state
                    .pages
                    .insert(PageKey::new(status, &search, 1), first.items);
                total
            }
        };

        let pages = page_count(total);
        let mut collected: BTreeMap<u32, Vec<Import>> = BTreeMap::new();
        let mut missing = Vec::new();
        {
            let state = self.lock();
            for page in 1..=pages {
                let key = PageKey::new(status, &search, page);
                match state.pages.get(&key) {
                    Some(items) => {
                        collected.insert(page, items.clone());
                    }
                    None => missing.push(page),
                }
            }
        }

        debug!(
            "Export collection: {} page(s), {} fetched, {} from cache",
            pages,
            missing.len(),
            collected.len()
        );

        let source = &self.source;
        let search_ref = &search;
        let fetched: Vec<(u32, ImportPage)> = stream::iter(missing)
            .map(|page| async move {
                let offset = (page as usize - 1) * PAGE_SIZE;
                let fetched = source.fetch_page(PAGE_SIZE, offset, status, search_ref).await?;
                Ok::<_, GatewayError>((page, fetched))
            })
            .buffer_unordered(EXPORT_FETCH_CONCURRENCY)
            .try_collect()
            .await?;

        {
            let mut state = self.lock();
            for (page, page_data) in &fetched {
                state
                    .pages
                    .insert(PageKey::new(status, &search, *page), page_data.items.clone());
            }
        }
        for (page, page_data) in fetched {
            collected.insert(page, page_data.items);
        }

        Ok(collected.into_values().flatten().collect())
    }
}
