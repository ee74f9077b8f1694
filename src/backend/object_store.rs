use crate::models::ImportFileInfo;
use reqwest::{Client, Error as ReqwestError, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("storage returned HTTP {0}")]
    Api(StatusCode),
}

/// Validity window of signed download URLs, in seconds
pub const SIGNED_URL_TTL_SECS: u64 = 60;

/// Listed object as returned by the storage list endpoint
#[derive(Debug, Deserialize)]
struct StoredObject {
    name: String,
    metadata: Option<ObjectMetadata>,
}

#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// Client for the object storage REST surface.
///
/// Objects live under `<import_id>/<file_name>` inside one bucket; each path
/// segment is percent-encoded when it appears in a URL.
#[derive(Clone)]
pub struct ObjectStoreClient {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl ObjectStoreClient {
    pub fn new(base_url: String, anon_key: String, bucket: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            anon_key,
            bucket,
        }
    }

    /// Storage path for the file attached to an import
    pub fn object_path(import_id: &str, file_name: &str) -> String {
        format!(
            "{}/{}",
            urlencoding::encode(import_id),
            urlencoding::encode(file_name)
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Upload a file under the import's prefix. Re-uploading the same name
    /// replaces the previous content (upsert).
    pub async fn upload(
        &self,
        import_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            self.bucket,
            Self::object_path(import_id, file_name)
        );

        let response = self
            .request(self.client.post(&url))
            .header("x-upsert", "true")
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Api(response.status()));
        }

        Ok(())
    }

    /// First object (by name, ascending) stored under the import's prefix
    pub async fn list_first(
        &self,
        import_id: &str,
    ) -> Result<Option<ImportFileInfo>, StorageError> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);

        let response = self
            .request(self.client.post(&url))
            .json(&json!({
                "prefix": import_id,
                "limit": 1,
                "offset": 0,
                "sortBy": { "column": "name", "order": "asc" },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Api(response.status()));
        }

        let objects: Vec<StoredObject> = response.json().await?;
        Ok(objects.into_iter().next().map(|object| ImportFileInfo {
            name: object.name,
            size: object.metadata.and_then(|m| m.size),
        }))
    }

    /// Time-limited signed download URL for a stored object
    pub async fn sign(&self, import_id: &str, file_name: &str) -> Result<String, StorageError> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url,
            self.bucket,
            Self::object_path(import_id, file_name)
        );

        let response = self
            .request(self.client.post(&url))
            .json(&json!({ "expiresIn": SIGNED_URL_TTL_SECS }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Api(response.status()));
        }

        let signed: SignResponse = response.json().await?;
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }

    /// Remove stored objects by path prefix
    pub async fn delete_prefixes(&self, prefixes: Vec<String>) -> Result<(), StorageError> {
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);

        let response = self
            .request(self.client.delete(&url))
            .json(&json!({ "prefixes": prefixes }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Api(response.status()));
        }

        Ok(())
    }
}
