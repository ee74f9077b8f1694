use crate::models::{is_uuid, Import, ImportPage, ImportStatus};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// Name of the single slot file holding the local collection
const SLOT_FILE: &str = "imports.json";

/// Fallback store: one JSON file containing the whole collection, newest
/// record first.
///
/// Read paths never fail; an unreadable or corrupt slot is logged and
/// treated as empty. Write failures are logged and swallowed so callers keep
/// the record they already hold.
#[derive(Clone, Debug)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SLOT_FILE),
        }
    }

    async fn read(&self) -> Vec<Import> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read local imports slot: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(items) => items,
            Err(e) => {
                warn!("Local imports slot is corrupt, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    async fn write(&self, items: &[Import]) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!("Failed to create local data directory: {}", e);
                return;
            }
        }

        match serde_json::to_vec(items) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw).await {
                    warn!("Failed to write local imports slot: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize local imports: {}", e),
        }
    }

    /// Every record, most recently updated first
    pub async fn list_all(&self) -> Vec<Import> {
        let mut items = self.read().await;
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        items
    }

    /// In-memory mirror of the backend's paged listing contract
    pub async fn list_page(
        &self,
        limit: usize,
        offset: usize,
        status: Option<ImportStatus>,
        search: &str,
    ) -> ImportPage {
        let mut items: Vec<Import> = self
            .read()
            .await
            .into_iter()
            .filter(|item| matches(item, status, search))
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = items.len() as u64;
        let items = items
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();

        ImportPage { items, total }
    }

    pub async fn get(&self, id: &str) -> Option<Import> {
        self.read().await.into_iter().find(|item| item.id == id)
    }

    pub async fn insert_front(&self, record: Import) {
        let mut items = self.read().await;
        items.insert(0, record);
        self.write(&items).await;
    }

    pub async fn remove(&self, id: &str) {
        let mut items = self.read().await;
        items.retain(|item| item.id != id);
        self.write(&items).await;
    }
}

/// Shared listing predicate: optional status match plus a case-insensitive
/// name substring search that also matches the identifier exactly when the
/// search text is a UUID
fn matches(item: &Import, status: Option<ImportStatus>, search: &str) -> bool {
    if let Some(status) = status {
        if item.status != status {
            return false;
        }
    }

    let search = search.trim();
    if search.is_empty() {
        return true;
    }

    if item
        .name
        .to_lowercase()
        .contains(&search.to_lowercase())
    {
        return true;
    }

    is_uuid(search) && item.id == search
}
