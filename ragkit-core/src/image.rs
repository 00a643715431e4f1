//! Conversion of image payloads into inline `data:` URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::node::ImageSource;

/// Convert an image payload into an inline base64 `data:` URL.
///
/// `DataUrl` sources pass through unchanged; `Bytes` are encoded directly;
/// `Path` sources are read from disk and their mime type inferred from the
/// file extension.
///
/// # Errors
///
/// Returns [`CoreError::ImageConversion`] if a file cannot be read.
pub async fn to_data_url(source: &ImageSource) -> Result<String> {
    match source {
        ImageSource::DataUrl(url) => Ok(url.clone()),
        ImageSource::Bytes { data, mime_type } => Ok(encode(data, mime_type)),
        ImageSource::Path(path) => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                CoreError::ImageConversion(format!("failed to read '{}': {e}", path.display()))
            })?;
            let mime_type = mime_for_path(path);
            debug!(path = %path.display(), bytes = data.len(), "inlined image file");
            Ok(encode(&data, mime_type))
        }
    }
}

fn encode(data: &[u8], mime_type: &str) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(data))
}

fn mime_for_path(path: &std::path::Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
