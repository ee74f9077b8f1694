use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of files that can be attached to a single import.
///
/// The file lookup only ever surfaces one stored object per import, so the
/// creation form caps attachments at one.
pub const MAX_UPLOAD_FILES: usize = 1;

/// Format of the ingested file behind an import record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImportType {
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "Excel")]
    Excel,
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "JSON")]
    Json,
}

impl ImportType {
    pub const ALL: [ImportType; 4] = [
        ImportType::Csv,
        ImportType::Excel,
        ImportType::Xml,
        ImportType::Json,
    ];

    /// Wire value, also used as the display label
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Csv => "CSV",
            ImportType::Excel => "Excel",
            ImportType::Xml => "XML",
            ImportType::Json => "JSON",
        }
    }

    pub fn from_key(key: &str) -> Option<ImportType> {
        ImportType::ALL.iter().copied().find(|t| t.as_str() == key)
    }

    /// File extensions accepted for this import type (lowercase, no dot)
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            ImportType::Csv => &["csv"],
            ImportType::Excel => &["xls", "xlsx"],
            ImportType::Xml => &["xml"],
            ImportType::Json => &["json"],
        }
    }
}

impl std::fmt::Display for ImportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an import record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Pending,
    Completed,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Pending => "pending",
            ImportStatus::Completed => "completed",
            ImportStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status filter for the listing views.
///
/// "All" exists only here; it is never a persistable record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    All,
    Only(ImportStatus),
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(ImportStatus::Completed),
        StatusFilter::Only(ImportStatus::Pending),
        StatusFilter::Only(ImportStatus::Failed),
    ];

    /// The concrete status to filter on, or None when unfiltered
    pub fn status(&self) -> Option<ImportStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(status) => Some(*status),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    pub fn from_key(key: &str) -> StatusFilter {
        StatusFilter::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == key)
            .unwrap_or(StatusFilter::All)
    }
}

/// Metadata record describing one file-based ingestion job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Import {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub import_type: ImportType,
    pub status: ImportStatus,
    /// 0-100; absence means the backend never reported progress
    pub progress: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Import {
    /// Progress shown in the UI and in exports; unreported progress renders
    /// as 100 (the record was created against an already-finished ingestion)
    pub fn progress_display(&self) -> u8 {
        self.progress.unwrap_or(100)
    }

    /// Last-updated timestamp as shown in tables
    pub fn updated_label(&self) -> String {
        self.updated_at.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Creation timestamp as shown in the detail view
    pub fn created_label(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Input for creating a new import record
#[derive(Debug, Clone)]
pub struct CreateImport {
    pub name: String,
    pub import_type: ImportType,
    pub status: Option<ImportStatus>,
    pub progress: Option<u8>,
}

/// Name and size of the file stored alongside an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFileInfo {
    pub name: String,
    pub size: Option<u64>,
}

/// One slice of a filtered listing plus the filter-wide record count
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPage {
    pub items: Vec<Import>,
    pub total: u64,
}

/// Lowercased extension of a file name, empty when there is none
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .filter(|ext| *ext != file_name)
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Whether a file name carries an extension accepted for the given type
pub fn is_extension_allowed(file_name: &str, import_type: ImportType) -> bool {
    let extension = file_extension(file_name);
    import_type
        .allowed_extensions()
        .contains(&extension.as_str())
}

/// Whether a search string is syntactically a UUID (and may therefore match
/// a record identifier exactly)
pub fn is_uuid(text: &str) -> bool {
    Uuid::parse_str(text).is_ok()
}
