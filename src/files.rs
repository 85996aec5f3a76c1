/// Local file acquisition: native picker plus async loading
use crate::state::image::{ImageError, ImagePayload};
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extensions offered in the picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Show the native file picker. Returns `None` if the user cancels.
pub fn pick_image() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select a Photo")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
}

/// Read `path` and turn it into an [`ImagePayload`]
///
/// The format is detected from the file contents, so a mislabelled
/// extension still works and a non-image file is rejected.
pub async fn load_image(path: PathBuf) -> Result<ImagePayload, ImageError> {
    let bytes = tokio::fs::read(&path).await?;
    let payload = ImagePayload::from_bytes(bytes)?;

    info!(
        "📂 Loaded {} ({} bytes, {})",
        display_name(&path),
        payload.len(),
        payload.mime()
    );
    Ok(payload)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[tokio::test]
    async fn test_load_image_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        // Extension deliberately wrong
        let path = dir.path().join("portrait.png");
        std::fs::write(&path, JPEG_MAGIC).unwrap();

        let payload = load_image(path).await.unwrap();
        assert_eq!(payload.mime(), "image/jpeg");
        assert_eq!(payload, ImagePayload::new("image/jpeg", JPEG_MAGIC));
    }

    #[tokio::test]
    async fn test_same_file_can_be_loaded_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.jpg");
        std::fs::write(&path, JPEG_MAGIC).unwrap();

        let first = load_image(path.clone()).await.unwrap();
        let second = load_image(path).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_load_non_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, "shopping list").unwrap();

        let result = load_image(path).await;
        assert!(matches!(result, Err(ImageError::UnsupportedFormat)));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let result = load_image(PathBuf::from("/nonexistent/photo.jpg")).await;
        assert!(matches!(result, Err(ImageError::Io(_))));
    }
}
