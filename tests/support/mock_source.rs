use async_trait::async_trait;
use intake::backend::GatewayError;
use intake::listing::PageSource;
use intake::models::{Import, ImportPage, StatusFilter};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Page source over a fixed collection, counting every fetch so tests can
/// assert that cache hits never reach the source
pub struct CountingSource {
    items: Vec<Import>,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(items: Vec<Import>) -> Self {
        Self {
            items,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for CountingSource {
    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
        status: StatusFilter,
        search: &str,
    ) -> Result<ImportPage, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let search = search.trim().to_lowercase();
        let filtered: Vec<Import> = self
            .items
            .iter()
            .filter(|item| match status.status() {
                Some(wanted) => item.status == wanted,
                None => true,
            })
            .filter(|item| search.is_empty() || item.name.to_lowercase().contains(&search))
            .cloned()
            .collect();

        let total = filtered.len() as u64;
        Ok(ImportPage {
            items: filtered.into_iter().skip(offset).take(limit).collect(),
            total,
        })
    }
}

/// Source whose first fetch blocks until released while later fetches
/// resolve immediately; used to race a stale request against a newer one
pub struct GatedSource {
    calls: AtomicUsize,
    release_first: Notify,
    first: ImportPage,
    rest: ImportPage,
}

impl GatedSource {
    pub fn new(first: ImportPage, rest: ImportPage) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            release_first: Notify::new(),
            first,
            rest,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn release_first(&self) {
        self.release_first.notify_one();
    }
}

#[async_trait]
impl PageSource for GatedSource {
    async fn fetch_page(
        &self,
        _limit: usize,
        _offset: usize,
        _status: StatusFilter,
        _search: &str,
    ) -> Result<ImportPage, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            self.release_first.notified().await;
            Ok(self.first.clone())
        } else {
            Ok(self.rest.clone())
        }
    }
}

/// Source that always fails
pub struct FailingSource;

#[async_trait]
impl PageSource for FailingSource {
    async fn fetch_page(
        &self,
        _limit: usize,
        _offset: usize,
        _status: StatusFilter,
        _search: &str,
    ) -> Result<ImportPage, GatewayError> {
        Err(GatewayError::StorageUnavailable)
    }
}
