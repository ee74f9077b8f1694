use crate::backend::ImportsGateway;
use crate::ui::toast_context::ToastContext;
use rfd::AsyncFileDialog;
use tracing::debug;

/// Resolve the import's signed download URL, fetch the bytes and save them
/// where the user chooses. Every failure ends in a toast, never a crash.
pub async fn save_stored_file(gateway: ImportsGateway, toasts: ToastContext, import_id: String) {
    let Some(info) = gateway.file_info(&import_id).await else {
        toasts.alert("No file is stored for this import");
        return;
    };

    let Some(url) = gateway.file_download_url(&import_id).await else {
        toasts.alert("Could not resolve a download link");
        return;
    };

    debug!("Downloading stored file {} for import {}", info.name, import_id);
    let bytes = match fetch_bytes(&url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            toasts.alert(format!("Download failed: {}", e));
            return;
        }
    };

    if let Some(handle) = AsyncFileDialog::new()
        .set_title("Save import file")
        .set_file_name(&info.name)
        .save_file()
        .await
    {
        match tokio::fs::write(handle.path(), &bytes).await {
            Ok(()) => toasts.info(format!("Saved {}", info.name)),
            Err(e) => toasts.alert(format!("Failed to save file: {}", e)),
        }
    }
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
