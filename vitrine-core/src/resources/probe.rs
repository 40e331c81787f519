use std::path::Path;

use async_trait::async_trait;

/// Answers "does a loadable image live here?" for naming detection.
#[async_trait]
pub trait ResourceProbe: Send + Sync {
    async fn probe(&self, location: &Path) -> bool;
}

/// Probes the filesystem by reading the image header.
#[cfg(feature = "image")]
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

#[cfg(feature = "image")]
#[async_trait]
impl ResourceProbe for FsProbe {
    async fn probe(&self, location: &Path) -> bool {
        let path = location.to_path_buf();
        let outcome = tokio::task::spawn_blocking(move || {
            image::ImageReader::open(&path)
                .and_then(|reader| reader.with_guessed_format())
                .map_err(image::ImageError::IoError)
                .and_then(|reader| reader.into_dimensions())
        })
        .await;

        match outcome {
            Ok(Ok(_)) => true,
            Ok(Err(err)) => {
                tracing::trace!(location = %location.display(), error = %err, "probe miss");
                false
            }
            Err(err) => {
                tracing::warn!(location = %location.display(), error = %err, "probe task failed");
                false
            }
        }
    }
}
