use crate::models::{is_uuid, Import, ImportStatus};
use reqwest::{Client, Error as ReqwestError, StatusCode};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),
    #[error("backend returned HTTP {0}")]
    Api(StatusCode),
    #[error("backend response carried no usable row count: {0}")]
    MalformedCount(String),
    #[error("backend returned no row for the inserted record")]
    EmptyRepresentation,
    #[error("delete affected no rows")]
    NothingDeleted,
}

/// Client for the PostgREST-style `imports` resource.
///
/// Every call authenticates with the anonymous key as both `apikey` header
/// and bearer token.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

const SELECT_COLUMNS: &str = "id,name,type,status,progress,created_at,updated_at";

impl RestClient {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            anon_key,
        }
    }

    fn resource_url(&self) -> String {
        format!("{}/rest/v1/imports", self.base_url)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Every record, most recently updated first
    pub async fn list_all(&self) -> Result<Vec<Import>, BackendError> {
        let response = self
            .request(self.client.get(self.resource_url()))
            .query(&[("select", SELECT_COLUMNS), ("order", "updated_at.desc")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(response.status()));
        }

        Ok(response.json().await?)
    }

    /// One slice of the filtered listing plus the exact filter-wide count,
    /// taken from the `Content-Range` header
    pub async fn list_page(
        &self,
        limit: usize,
        offset: usize,
        status: Option<ImportStatus>,
        search: &str,
    ) -> Result<(Vec<Import>, u64), BackendError> {
        let response = self
            .request(self.client.get(self.resource_url()))
            .query(&page_query(limit, offset, status, search))
            .header("Prefer", "count=exact")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(response.status()));
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_default();
        let total = parse_content_range_total(&content_range)
            .ok_or(BackendError::MalformedCount(content_range))?;

        let items: Vec<Import> = response.json().await?;
        Ok((items, total))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Import>, BackendError> {
        let response = self
            .request(self.client.get(self.resource_url()))
            .query(&[
                ("select", SELECT_COLUMNS.to_string()),
                ("id", format!("eq.{}", id)),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(response.status()));
        }

        let mut rows: Vec<Import> = response.json().await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    /// Insert a fully synthesized record and return the stored row
    pub async fn insert(&self, record: &Import) -> Result<Import, BackendError> {
        let response = self
            .request(self.client.post(self.resource_url()))
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(response.status()));
        }

        let rows: Vec<Import> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or(BackendError::EmptyRepresentation)
    }

    /// Delete one record. The backend must return the deleted row; a zero-row
    /// response means nothing was removed (typically a policy
    /// misconfiguration) and is surfaced as an error rather than masked.
    pub async fn delete(&self, id: &str) -> Result<(), BackendError> {
        let response = self
            .request(self.client.delete(self.resource_url()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(response.status()));
        }

        let rows: Vec<Import> = response.json().await?;
        if rows.is_empty() {
            warn!("Delete of import {} affected no rows", id);
            return Err(BackendError::NothingDeleted);
        }

        Ok(())
    }
}

/// Query parameters for a paged listing request.
///
/// A non-empty search matches names case-insensitively; when the text is
/// syntactically a UUID it additionally matches the identifier exactly.
fn page_query(
    limit: usize,
    offset: usize,
    status: Option<ImportStatus>,
    search: &str,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("select".to_string(), SELECT_COLUMNS.to_string()),
        ("order".to_string(), "updated_at.desc".to_string()),
        ("limit".to_string(), limit.to_string()),
        ("offset".to_string(), offset.to_string()),
    ];

    if let Some(status) = status {
        params.push(("status".to_string(), format!("eq.{}", status)));
    }

    let search = search.trim();
    if !search.is_empty() {
        if is_uuid(search) {
            params.push((
                "or".to_string(),
                format!("(name.ilike.*{search}*,id.eq.{search})"),
            ));
        } else {
            params.push(("name".to_string(), format!("ilike.*{search}*")));
        }
    }

    params
}

/// Total record count from a `Content-Range: <range>/<total>` header value
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_total_is_the_part_after_the_slash() {
        assert_eq!(parse_content_range_total("0-4/23"), Some(23));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total(""), None);
        assert_eq!(parse_content_range_total("0-4/*"), None);
    }

    #[test]
    fn page_query_includes_status_and_plain_search() {
        let params = page_query(5, 10, Some(ImportStatus::Failed), "  invoices ");
        assert!(params.contains(&("limit".to_string(), "5".to_string())));
        assert!(params.contains(&("offset".to_string(), "10".to_string())));
        assert!(params.contains(&("status".to_string(), "eq.failed".to_string())));
        assert!(params.contains(&("name".to_string(), "ilike.*invoices*".to_string())));
    }

    #[test]
    fn page_query_uses_compound_filter_for_uuid_search() {
        let id = "2f6df2a6-9a3c-4a6e-9a51-0f82f9cf1a11";
        let params = page_query(5, 0, None, id);
        assert!(params
            .iter()
            .any(|(k, v)| k == "or" && v == &format!("(name.ilike.*{id}*,id.eq.{id})")));
        assert!(!params.iter().any(|(k, _)| k == "status"));
    }
}
