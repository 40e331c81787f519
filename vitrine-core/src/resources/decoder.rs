use std::path::Path;
#[cfg(feature = "image")]
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
#[cfg(feature = "image")]
use crate::error::ViewerError;

/// Turns a slide's resource location into a display-ready image handle.
///
/// Implementations run inside a spawned tokio task, so CPU-heavy work should
/// move to the blocking pool.
#[async_trait]
pub trait ImageDecoder: Send + Sync + 'static {
    type Image: Clone + Send + Sync + 'static;

    async fn decode(&self, location: &Path) -> Result<Self::Image>;
}

/// Decoded RGBA8 pixels. Clones share the pixel buffer.
#[cfg(feature = "image")]
#[derive(Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

#[cfg(feature = "image")]
impl DecodedImage {
    /// Resident byte size, used for memory budgeting.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(feature = "image")]
impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Filesystem decoder backed by the `image` crate.
#[cfg(feature = "image")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RgbaDecoder;

#[cfg(feature = "image")]
#[async_trait]
impl ImageDecoder for RgbaDecoder {
    type Image = DecodedImage;

    async fn decode(&self, location: &Path) -> Result<DecodedImage> {
        let bytes = tokio::fs::read(location).await.map_err(|source| {
            ViewerError::Io {
                path: location.to_path_buf(),
                source,
            }
        })?;

        let path = location.to_path_buf();
        tokio::task::spawn_blocking(move || decode_rgba(&path, &bytes))
            .await
            .map_err(|err| ViewerError::Task(err.to_string()))?
    }
}

/// Decodes encoded image bytes into RGBA8 pixels.
#[cfg(feature = "image")]
pub fn decode_rgba(path: &Path, bytes: &[u8]) -> Result<DecodedImage> {
    let decoded =
        image::load_from_memory(bytes).map_err(|err| ViewerError::Decode {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        pixels: Arc::from(rgba.into_raw()),
    })
}
