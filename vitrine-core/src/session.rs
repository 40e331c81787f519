use std::sync::Arc;

use vitrine_model::{NamingScheme, SlideCount};

use crate::error::Result;
use crate::resources::{ResourceProbe, SchemeResolver, SlideLocator};
use crate::settings::GallerySettings;

/// Immutable per-session state shared by the index and the viewer.
///
/// Naming detection is memoized here, so however many viewers a session
/// opens, slide 1 is probed at most once.
pub struct GallerySession {
    total: SlideCount,
    resolver: SchemeResolver,
    probe: Arc<dyn ResourceProbe>,
}

impl GallerySession {
    pub fn new(
        settings: &GallerySettings,
        probe: Arc<dyn ResourceProbe>,
    ) -> Result<Self> {
        let total = SlideCount::try_from(settings.total_slides)?;
        Ok(Self {
            total,
            resolver: SchemeResolver::new(
                settings.image_dir.clone(),
                settings.naming.clone(),
            ),
            probe,
        })
    }

    pub fn total(&self) -> SlideCount {
        self.total
    }

    pub async fn scheme(&self) -> &NamingScheme {
        self.resolver.resolve(self.probe.as_ref()).await
    }

    pub async fn locator(&self) -> SlideLocator {
        let scheme = self.scheme().await.clone();
        SlideLocator::new(self.resolver.directory(), scheme, self.total)
    }
}

impl std::fmt::Debug for GallerySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GallerySession")
            .field("total", &self.total)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
