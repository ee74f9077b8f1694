use std::path::PathBuf;

/// Connection details for the remote backend (REST resource + object storage)
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the backend project, without a trailing slash
    pub url: String,
    /// Anonymous API key sent as both `apikey` and bearer token
    pub anon_key: String,
    /// Object storage bucket holding uploaded import files
    pub bucket: String,
}

/// Application configuration
///
/// Resolved once at startup. A missing backend section is not an error: the
/// gateway runs against the local slot store instead ("local mode"), and the
/// mode is carried as a value here rather than broadcast globally.
#[derive(Clone, Debug)]
pub struct Config {
    /// Remote backend, when configured
    pub backend: Option<BackendConfig>,
    /// Directory holding locally persisted state
    pub data_dir: PathBuf,
}

const DEFAULT_BUCKET: &str = "imports";

impl Config {
    /// Load configuration from the environment.
    /// In debug builds a `.env` file is loaded first when present.
    pub fn load() -> Self {
        #[cfg(debug_assertions)]
        if dotenvy::dotenv().is_ok() {
            tracing::info!("Config: loaded .env file");
        }

        Self::from_env()
    }

    fn from_env() -> Self {
        let url = non_empty_var("INTAKE_BACKEND_URL");
        let anon_key = non_empty_var("INTAKE_BACKEND_ANON_KEY");

        let backend = match (url, anon_key) {
            (Some(url), Some(anon_key)) => Some(BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
                bucket: non_empty_var("INTAKE_STORAGE_BUCKET")
                    .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            }),
            _ => None,
        };

        if backend.is_some() {
            tracing::info!("Config: remote backend configured");
        } else {
            tracing::info!("Config: no backend configured, running in local mode");
        }

        Self {
            backend,
            data_dir: resolve_data_dir(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn resolve_data_dir() -> PathBuf {
    if let Some(dir) = non_empty_var("INTAKE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    let home_dir = dirs::home_dir().expect("Failed to get home directory");
    home_dir.join(".intake")
}
