use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;

use super::ClientError;

/// Raw image bytes plus the MIME type sent to the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoresheetImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl ScoresheetImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let mime_type = sniff_mime(&bytes);
        Self { bytes, mime_type }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    Path(PathBuf),
}

impl ImageSource {
    /// Anything starting with `http` is fetched; the rest is a local path.
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        if reference.starts_with("http") {
            Self::Url(reference.to_string())
        } else {
            Self::Path(PathBuf::from(reference))
        }
    }
}

/// Detect the image format from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

pub struct ImageLoader {
    client: Client,
    root: Option<PathBuf>,
}

impl ImageLoader {
    pub fn new(timeout_secs: u64, root: Option<PathBuf>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent("ScoresheetPgn/1.0")
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(format!("HTTP client error: {e}")))?;
        Ok(Self { client, root })
    }

    pub async fn load(&self, source: &ImageSource) -> Result<ScoresheetImage, ClientError> {
        let bytes = match source {
            ImageSource::Url(url) => self.download(url).await?,
            ImageSource::Path(path) => self.read_local(path).await?,
        };
        if bytes.is_empty() {
            return Err(ClientError::Rejected("Image file is empty".to_string()));
        }
        Ok(ScoresheetImage::from_bytes(bytes))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        tracing::info!("Downloading image from {url}");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request error: {e}")))?;

        if !resp.status().is_success() {
            return Err(ClientError::Transport(format!(
                "Failed to download image. Status code: {}",
                resp.status().as_u16()
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Body read error: {e}")))?;
        Ok(body.to_vec())
    }

    async fn read_local(&self, path: &Path) -> Result<Vec<u8>, ClientError> {
        let resolved = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| ClientError::Rejected(format!("Cannot open image {}: {e}", path.display())))?;

        if let Some(root) = &self.root {
            let root = tokio::fs::canonicalize(root)
                .await
                .map_err(|e| ClientError::Rejected(format!("Image root unavailable: {e}")))?;
            if !resolved.starts_with(&root) {
                return Err(ClientError::Rejected(format!(
                    "Image path {} is outside the image root",
                    path.display()
                )));
            }
        }

        tokio::fs::read(&resolved)
            .await
            .map_err(|e| ClientError::Rejected(format!("Cannot read image {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("scoresheet-image-{name}-{}", nanos % 1_000_000_000));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(PNG_MAGIC), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a...."), "image/gif");
        assert_eq!(sniff_mime(b"RIFF\x10\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime(b"RIFF\x10\0\0\0WAVE"), "image/jpeg");
        assert_eq!(sniff_mime(b""), "image/jpeg");
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(
            ImageSource::parse("https://example.org/sheet.jpg"),
            ImageSource::Url("https://example.org/sheet.jpg".to_string())
        );
        assert_eq!(
            ImageSource::parse(" scans/sheet.png "),
            ImageSource::Path(PathBuf::from("scans/sheet.png"))
        );
    }

    #[tokio::test]
    async fn test_load_local_file() {
        let dir = scratch_dir("local");
        let path = dir.join("sheet.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let loader = ImageLoader::new(5, None).unwrap();
        let image = loader.load(&ImageSource::Path(path)).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, PNG_MAGIC);

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let loader = ImageLoader::new(5, None).unwrap();
        let err = loader
            .load(&ImageSource::parse("/definitely/not/here/sheet.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_path_outside_root_is_rejected() {
        let root = scratch_dir("root");
        let outside = scratch_dir("outside");
        let path = outside.join("sheet.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let loader = ImageLoader::new(5, Some(root.clone())).unwrap();
        let err = loader.load(&ImageSource::Path(path)).await.unwrap_err();
        assert!(err.to_string().contains("outside the image root"));

        let inside = root.join("ok.png");
        std::fs::write(&inside, PNG_MAGIC).unwrap();
        assert!(loader.load(&ImageSource::Path(inside)).await.is_ok());

        std::fs::remove_dir_all(root).ok();
        std::fs::remove_dir_all(outside).ok();
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let dir = scratch_dir("empty");
        let path = dir.join("blank.jpg");
        std::fs::write(&path, b"").unwrap();

        let loader = ImageLoader::new(5, None).unwrap();
        let err = loader.load(&ImageSource::Path(path)).await.unwrap_err();
        assert_eq!(err.to_string(), "Image file is empty");

        std::fs::remove_dir_all(dir).ok();
    }
}
