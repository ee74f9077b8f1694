#![allow(dead_code)]

pub mod fake_backend;
pub mod mock_source;

pub use fake_backend::FakeBackend;
pub use mock_source::{CountingSource, FailingSource, GatedSource};

use chrono::{Duration, Utc};
use intake::config::{BackendConfig, Config};
use intake::models::{Import, ImportStatus, ImportType};
use uuid::Uuid;

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Configuration with no backend: the gateway runs in local mode against the
/// given temporary data directory
pub fn local_config(dir: &tempfile::TempDir) -> Config {
    Config {
        backend: None,
        data_dir: dir.path().to_path_buf(),
    }
}

/// Configuration pointing at an in-process fake backend
pub fn remote_config(base_url: &str, dir: &tempfile::TempDir) -> Config {
    Config {
        backend: Some(BackendConfig {
            url: base_url.trim_end_matches('/').to_string(),
            anon_key: "test-key".to_string(),
            bucket: "imports".to_string(),
        }),
        data_dir: dir.path().to_path_buf(),
    }
}

/// A fully populated record; `minutes_ago` spaces out `updated_at` so
/// ordering assertions are deterministic
pub fn sample_import(name: &str, status: ImportStatus, minutes_ago: i64) -> Import {
    let stamp = Utc::now() - Duration::minutes(minutes_ago);
    Import {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        import_type: ImportType::Csv,
        status,
        progress: Some(100),
        created_at: stamp,
        updated_at: stamp,
    }
}

/// `count` records named `import-01..`, newest first
pub fn many_imports(count: usize) -> Vec<Import> {
    (0..count)
        .map(|i| {
            sample_import(
                &format!("import-{:02}", i + 1),
                ImportStatus::Completed,
                i as i64,
            )
        })
        .collect()
}
