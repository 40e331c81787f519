use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, trace};
use vitrine_model::SlideNumber;

use super::residency::{ResidencyCache, ResidentImage};
use crate::resources::{ImageDecoder, SlideLocator};

/// Outcome of waiting on a preload window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowReport {
    /// Distinct slides in the window.
    pub requested: usize,
    /// Slides whose decode succeeded before the deadline.
    pub decoded: usize,
    pub timed_out: bool,
}

/// Keeps decoded images resident around the current slide.
pub struct Preloader<D: ImageDecoder> {
    decoder: Arc<D>,
    locator: SlideLocator,
    cache: ResidencyCache<ResidentImage<D::Image>>,
}

impl<D: ImageDecoder> Preloader<D> {
    pub fn new(decoder: Arc<D>, locator: SlideLocator, capacity: usize) -> Self {
        Self {
            decoder,
            locator,
            cache: ResidencyCache::new(capacity),
        }
    }

    pub fn locator(&self) -> &SlideLocator {
        &self.locator
    }

    pub fn cache(&self) -> &ResidencyCache<ResidentImage<D::Image>> {
        &self.cache
    }

    /// Returns the resident entry for `slide`, starting its decode first when
    /// it is not cached. May evict the oldest-inserted entry.
    pub fn ensure_resident(&mut self, slide: SlideNumber) -> ResidentImage<D::Image> {
        if let Some(resident) = self.cache.get(slide) {
            return resident.clone();
        }

        let location = self.locator.location(slide);
        let decoder = Arc::clone(&self.decoder);
        let path = location.clone();
        let task = tokio::spawn(async move {
            match decoder.decode(&path).await {
                Ok(image) => Some(image),
                Err(err) => {
                    debug!(location = %path.display(), error = %err, "slide decode failed");
                    None
                }
            }
        });

        let resident = ResidentImage::new(slide, location, async move {
            task.await.ok().flatten()
        });

        if let Some((evicted, _)) = self.cache.insert(slide, resident.clone()) {
            trace!(%evicted, %slide, "evicted resident slide");
        }
        resident
    }

    /// Ensures every slide within `radius` of `center` is resident, wrapping
    /// around the collection. Returns the distinct entries in window order.
    pub fn ensure_window(
        &mut self,
        center: SlideNumber,
        radius: usize,
    ) -> Vec<ResidentImage<D::Image>> {
        let total = self.locator.total();
        // Half the collection on each side already reaches every slide.
        let radius = radius.min(total.get() as usize / 2) as i64;
        let mut window: Vec<ResidentImage<D::Image>> = Vec::new();

        for delta in -radius..=radius {
            let slide = center.offset(delta, total);
            if window.iter().any(|seen| seen.slide() == slide) {
                continue;
            }
            window.push(self.ensure_resident(slide));
        }
        window
    }

    /// Ensures the window and waits for its decodes, giving up after
    /// `timeout`. Failed decodes count as not decoded.
    pub async fn settle_window(
        &mut self,
        center: SlideNumber,
        radius: usize,
        timeout: Duration,
    ) -> WindowReport {
        let window = self.ensure_window(center, radius);
        let requested = window.len();

        let pending = join_all(window.iter().map(ResidentImage::ready));
        match tokio::time::timeout(timeout, pending).await {
            Ok(outcomes) => WindowReport {
                requested,
                decoded: outcomes.iter().filter(|image| image.is_some()).count(),
                timed_out: false,
            },
            Err(_) => {
                let decoded =
                    window.iter().filter(|image| image.peek().is_some()).count();
                debug!(%center, requested, decoded, "preload window timed out");
                WindowReport {
                    requested,
                    decoded,
                    timed_out: true,
                }
            }
        }
    }
}

impl<D: ImageDecoder> std::fmt::Debug for Preloader<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("locator", &self.locator)
            .field("resident", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedDecoder;
    use vitrine_model::{NamingScheme, SlideCount};

    fn preloader(
        decoder: Arc<ScriptedDecoder>,
        total: u32,
        capacity: usize,
    ) -> Preloader<ScriptedDecoder> {
        let locator = SlideLocator::new(
            "img",
            NamingScheme::default(),
            SlideCount::new(total).unwrap(),
        );
        Preloader::new(decoder, locator, capacity)
    }

    fn slide(n: u32) -> SlideNumber {
        SlideNumber::new(n).unwrap()
    }

    #[tokio::test]
    async fn cached_slide_is_not_decoded_twice() {
        let decoder = Arc::new(ScriptedDecoder::default());
        let mut preloader = preloader(Arc::clone(&decoder), 40, 8);

        preloader.ensure_resident(slide(4)).ready().await;
        preloader.ensure_resident(slide(4)).ready().await;

        assert_eq!(decoder.decode_count(), 1);
    }

    #[tokio::test]
    async fn window_wraps_around_the_collection() {
        let decoder = Arc::new(ScriptedDecoder::default());
        let mut preloader = preloader(decoder, 40, 8);

        let window = preloader.ensure_window(slide(1), 2);
        let slides: Vec<u32> = window.iter().map(|r| r.slide().get()).collect();

        assert_eq!(slides, [39, 40, 1, 2, 3]);
    }

    #[tokio::test]
    async fn small_collection_revisits_are_cache_hits() {
        let decoder = Arc::new(ScriptedDecoder::default());
        let mut preloader = preloader(Arc::clone(&decoder), 2, 8);

        let report = preloader
            .settle_window(slide(1), 2, Duration::from_secs(5))
            .await;

        assert_eq!(report.requested, 2);
        assert_eq!(report.decoded, 2);
        assert_eq!(decoder.decode_count(), 2);
        assert_eq!(preloader.cache().len(), 2);
    }

    #[tokio::test]
    async fn oversized_radius_decodes_each_slide_once() {
        let decoder = Arc::new(ScriptedDecoder::default());
        let mut preloader = preloader(Arc::clone(&decoder), 40, 8);

        let report = preloader
            .settle_window(slide(1), 1000, Duration::from_secs(5))
            .await;

        assert_eq!(report.requested, 40);
        assert_eq!(report.decoded, 40);
        assert_eq!(decoder.decode_count(), 40);
        assert_eq!(preloader.cache().len(), 8);
    }

    #[tokio::test]
    async fn unbounded_radius_is_clamped_to_the_collection() {
        let decoder = Arc::new(ScriptedDecoder::default());
        let mut preloader = preloader(decoder, 5, 8);

        let window = preloader.ensure_window(slide(3), usize::MAX);
        let slides: Vec<u32> = window.iter().map(|r| r.slide().get()).collect();

        assert_eq!(slides, [1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn evicted_slide_is_decoded_again() {
        let decoder = Arc::new(ScriptedDecoder::default());
        let mut preloader = preloader(Arc::clone(&decoder), 40, 2);

        for n in [1, 2, 3] {
            preloader.ensure_resident(slide(n)).ready().await;
        }
        assert!(!preloader.cache().contains(slide(1)));

        preloader.ensure_resident(slide(1)).ready().await;
        assert_eq!(decoder.decode_count(), 4);
    }

    #[tokio::test]
    async fn decode_failures_count_as_not_decoded() {
        let decoder = Arc::new(ScriptedDecoder::failing(["img/02.jpeg"]));
        let mut preloader = preloader(decoder, 40, 8);

        let report = preloader
            .settle_window(slide(2), 1, Duration::from_secs(5))
            .await;

        assert_eq!(
            report,
            WindowReport {
                requested: 3,
                decoded: 2,
                timed_out: false
            }
        );
        assert!(preloader.cache().contains(slide(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_window_times_out() {
        let decoder = Arc::new(
            ScriptedDecoder::default().with_delay(Duration::from_secs(10)),
        );
        let mut preloader = preloader(decoder, 40, 8);

        let report = preloader
            .settle_window(slide(10), 1, Duration::from_millis(350))
            .await;

        assert!(report.timed_out);
        assert_eq!(report.decoded, 0);
    }
}
