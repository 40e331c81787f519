use std::path::PathBuf;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use vitrine_model::{NamingScheme, SlideNumber};

use super::probe::ResourceProbe;
use crate::settings::NamingSettings;

/// One-time naming resolution for a session.
///
/// A fixed scheme resolves without touching the probe. A detecting scheme
/// probes slide 1 with each candidate in order and keeps the first hit. The
/// outcome is memoized: later calls return the stored scheme and never probe
/// again, even when detection found nothing and fell back.
#[derive(Debug)]
pub struct SchemeResolver {
    directory: PathBuf,
    naming: NamingSettings,
    resolved: OnceCell<NamingScheme>,
}

impl SchemeResolver {
    pub fn new(directory: impl Into<PathBuf>, naming: NamingSettings) -> Self {
        Self {
            directory: directory.into(),
            naming,
            resolved: OnceCell::new(),
        }
    }

    pub async fn resolve(&self, probe: &dyn ResourceProbe) -> &NamingScheme {
        self.resolved.get_or_init(|| self.detect(probe)).await
    }

    /// The memoized scheme, if resolution already ran.
    pub fn resolved(&self) -> Option<&NamingScheme> {
        self.resolved.get()
    }

    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    async fn detect(&self, probe: &dyn ResourceProbe) -> NamingScheme {
        let candidates = self.naming.candidates();

        if !self.naming.is_detect() {
            return candidates.into_iter().next().unwrap_or_default();
        }

        for candidate in &candidates {
            let location =
                candidate.location_in(&self.directory, SlideNumber::FIRST);
            if probe.probe(&location).await {
                info!(
                    scheme = %candidate,
                    directory = %self.directory.display(),
                    "detected slide naming"
                );
                return candidate.clone();
            }
            debug!(location = %location.display(), "naming candidate rejected");
        }

        let fallback = candidates.into_iter().next().unwrap_or_default();
        warn!(
            scheme = %fallback,
            directory = %self.directory.display(),
            "no naming candidate matched slide 1; using fallback"
        );
        fallback
    }
}
