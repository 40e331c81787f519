use std::path::Path;

use async_trait::async_trait;
use iced::widget::image::Handle;
use vitrine_core::resources::decoder::decode_rgba;
use vitrine_core::resources::ImageDecoder;
use vitrine_core::{Result, ViewerError};

/// Decodes slides straight into RGBA image handles on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct HandleDecoder;

#[async_trait]
impl ImageDecoder for HandleDecoder {
    type Image = Handle;

    async fn decode(&self, location: &Path) -> Result<Handle> {
        let bytes = tokio::fs::read(location).await.map_err(|source| {
            ViewerError::Io {
                path: location.to_path_buf(),
                source,
            }
        })?;

        let path = location.to_path_buf();
        let (handle, resident_bytes) = tokio::task::spawn_blocking(move || {
            handle_from_encoded_bytes(&path, &bytes)
        })
        .await
        .map_err(|err| ViewerError::Task(err.to_string()))??;

        log::trace!(
            "decoded {} ({} resident bytes)",
            location.display(),
            resident_bytes
        );
        Ok(handle)
    }
}

/// Converts encoded image bytes into a handle plus its resident byte size.
pub fn handle_from_encoded_bytes(
    path: &Path,
    bytes: &[u8],
) -> Result<(Handle, u64)> {
    let decoded = decode_rgba(path, bytes)?;
    let resident = decoded.byte_len() as u64;
    let handle =
        Handle::from_rgba(decoded.width, decoded.height, decoded.pixels.to_vec());
    Ok((handle, resident))
}
