use crate::backend::local_store::LocalStore;
use crate::backend::object_store::{ObjectStoreClient, StorageError};
use crate::backend::rest::{BackendError, RestClient};
use crate::config::Config;
use crate::models::{CreateImport, Import, ImportFileInfo, ImportPage, ImportStatus, StatusFilter};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("no backend is configured for file storage")]
    StorageUnavailable,
}

/// Why the gateway answered from the local slot store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalModeReason {
    /// No backend was configured at startup; local mode is the expected mode
    MissingConfig,
    /// A configured backend failed and the call was answered locally
    RemoteError,
}

/// Uniform access to import records and their stored files, hiding whether a
/// remote backend exists.
///
/// Read operations and `create` never fail: a missing configuration or a
/// failing remote call is answered from the local slot store and reported
/// through the local-mode notice channel. `delete` and `upload_file` do
/// propagate failures, since silently dropping them would mislead the user.
#[derive(Clone)]
pub struct ImportsGateway {
    rest: Option<RestClient>,
    store: Option<ObjectStoreClient>,
    local: LocalStore,
    local_mode_tx: Arc<watch::Sender<Option<LocalModeReason>>>,
}

impl ImportsGateway {
    pub fn new(config: &Config) -> Self {
        let rest = config
            .backend
            .as_ref()
            .map(|b| RestClient::new(b.url.clone(), b.anon_key.clone()));
        let store = config.backend.as_ref().map(|b| {
            ObjectStoreClient::new(b.url.clone(), b.anon_key.clone(), b.bucket.clone())
        });

        let (local_mode_tx, _) = watch::channel(None);

        Self {
            rest,
            store,
            local: LocalStore::new(&config.data_dir),
            local_mode_tx: Arc::new(local_mode_tx),
        }
    }

    /// Observe local-mode fallbacks. The first reason of the session wins;
    /// the UI consumes it once to show an informational notice.
    pub fn local_mode(&self) -> watch::Receiver<Option<LocalModeReason>> {
        self.local_mode_tx.subscribe()
    }

    fn notice_local_mode(&self, reason: LocalModeReason) {
        self.local_mode_tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });
    }

    /// Every record, most recently updated first. Never fails.
    pub async fn list_all(&self) -> Vec<Import> {
        let Some(rest) = &self.rest else {
            self.notice_local_mode(LocalModeReason::MissingConfig);
            return self.local.list_all().await;
        };

        match rest.list_all().await {
            Ok(items) => items,
            Err(e) => {
                warn!("Falling back to local imports after remote failure: {}", e);
                self.notice_local_mode(LocalModeReason::RemoteError);
                self.local.list_all().await
            }
        }
    }

    /// One slice of the filtered listing plus the filter-wide total.
    /// `limit` is clamped to at least one record. Never fails.
    pub async fn list_page(
        &self,
        limit: usize,
        offset: usize,
        filter: StatusFilter,
        search: &str,
    ) -> ImportPage {
        let limit = limit.max(1);
        let search = search.trim();
        let status = filter.status();

        let Some(rest) = &self.rest else {
            self.notice_local_mode(LocalModeReason::MissingConfig);
            return self.local.list_page(limit, offset, status, search).await;
        };

        match rest.list_page(limit, offset, status, search).await {
            Ok((items, total)) => ImportPage { items, total },
            Err(e) => {
                warn!("Falling back to local page after remote failure: {}", e);
                self.notice_local_mode(LocalModeReason::RemoteError);
                self.local.list_page(limit, offset, status, search).await
            }
        }
    }

    /// The matching record, or None when it does not exist. Never fails.
    pub async fn get_by_id(&self, id: &str) -> Option<Import> {
        let Some(rest) = &self.rest else {
            self.notice_local_mode(LocalModeReason::MissingConfig);
            return self.local.get(id).await;
        };

        match rest.get_by_id(id).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Falling back to local lookup after remote failure: {}", e);
                self.notice_local_mode(LocalModeReason::RemoteError);
                self.local.get(id).await
            }
        }
    }

    /// Synthesize and persist a new record. The caller always receives a
    /// valid record, even when remote persistence failed and the record only
    /// reached the local slot.
    pub async fn create(&self, input: CreateImport) -> Import {
        let now = Utc::now();
        let record = Import {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            import_type: input.import_type,
            status: input.status.unwrap_or(ImportStatus::Completed),
            progress: input.progress.map(|p| p.min(100)),
            created_at: now,
            updated_at: now,
        };

        let Some(rest) = &self.rest else {
            self.notice_local_mode(LocalModeReason::MissingConfig);
            self.local.insert_front(record.clone()).await;
            return record;
        };

        match rest.insert(&record).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Persisting import locally after remote failure: {}", e);
                self.notice_local_mode(LocalModeReason::RemoteError);
                self.local.insert_front(record.clone()).await;
                record
            }
        }
    }

    /// Remove a record. Against a remote backend the deletion must be
    /// confirmed (zero affected rows is an error); afterwards the associated
    /// stored file is removed best-effort. Local-mode deletion cannot fail.
    pub async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let Some(rest) = &self.rest else {
            self.local.remove(id).await;
            return Ok(());
        };

        rest.delete(id).await?;
        debug!("Deleted import {}", id);

        if let Some(store) = &self.store {
            match store.list_first(id).await {
                Ok(Some(info)) => {
                    if let Err(e) = store
                        .delete_prefixes(vec![format!("{}/{}", id, info.name)])
                        .await
                    {
                        warn!("Failed to delete stored file for import {}: {}", id, e);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to look up stored file for import {}: {}", id, e),
            }
        }

        Ok(())
    }

    /// Store a file under the import's prefix (upsert). File blobs have no
    /// local fallback; without a configured backend this fails.
    pub async fn upload_file(
        &self,
        import_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), GatewayError> {
        let store = self.store.as_ref().ok_or(GatewayError::StorageUnavailable)?;
        store.upload(import_id, file_name, bytes).await?;
        Ok(())
    }

    /// Name and size of the stored file, or None when there is none or no
    /// backend is configured. Never fails.
    pub async fn file_info(&self, import_id: &str) -> Option<ImportFileInfo> {
        let store = self.store.as_ref()?;

        match store.list_first(import_id).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Failed to list stored files for import {}: {}", import_id, e);
                None
            }
        }
    }

    /// Time-limited signed download URL for the import's stored file, or
    /// None when unavailable. Never fails.
    pub async fn file_download_url(&self, import_id: &str) -> Option<String> {
        let store = self.store.as_ref()?;
        let info = self.file_info(import_id).await?;

        match store.sign(import_id, &info.name).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Failed to sign download for import {}: {}", import_id, e);
                None
            }
        }
    }
}
