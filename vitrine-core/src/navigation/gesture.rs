use std::time::Instant;

use vitrine_model::Direction;

use crate::settings::SwipeSettings;

/// What a released drag resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragDecision {
    Commit(Direction),
    SnapBack,
}

#[derive(Debug, Clone, Copy)]
struct DragOrigin {
    x: f32,
    at: Instant,
}

/// Tracks one horizontal pointer drag across the stage.
#[derive(Debug, Clone)]
pub struct DragTracker {
    settings: SwipeSettings,
    origin: Option<DragOrigin>,
}

impl DragTracker {
    pub fn new(settings: SwipeSettings) -> Self {
        Self {
            settings,
            origin: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }

    pub fn begin(&mut self, x: f32, at: Instant) {
        self.origin = Some(DragOrigin { x, at });
    }

    /// Offset from the drag origin, or `None` when no drag is active.
    pub fn update(&self, x: f32) -> Option<f32> {
        self.origin.map(|origin| x - origin.x)
    }

    /// Ends the drag. Dragging toward the left commits forward, toward the
    /// right commits backward.
    ///
    /// A drag commits when it travelled at least the distance threshold, or
    /// when it is a flick: longer than the minimum flick and faster than the
    /// velocity threshold on average.
    pub fn release(&mut self, x: f32, at: Instant) -> Option<DragDecision> {
        let origin = self.origin.take()?;
        let dx = x - origin.x;
        let distance = dx.abs();
        let elapsed_ms = at.saturating_duration_since(origin.at).as_secs_f32() * 1000.0;
        let velocity = distance / elapsed_ms.max(1.0);

        let committed = distance >= self.settings.distance_px
            || (distance >= self.settings.min_flick_px
                && velocity >= self.settings.velocity_px_per_ms);

        if !committed {
            return Some(DragDecision::SnapBack);
        }

        let direction = if dx < 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        };
        Some(DragDecision::Commit(direction))
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tracker() -> DragTracker {
        DragTracker::new(SwipeSettings::default())
    }

    fn drag(dx: f32, over: Duration) -> Option<DragDecision> {
        let mut tracker = tracker();
        let start = Instant::now();
        tracker.begin(400.0, start);
        tracker.release(400.0 + dx, start + over)
    }

    #[test]
    fn long_drag_left_commits_forward() {
        assert_eq!(
            drag(-120.0, Duration::from_secs(2)),
            Some(DragDecision::Commit(Direction::Forward))
        );
    }

    #[test]
    fn long_drag_right_commits_backward() {
        assert_eq!(
            drag(60.0, Duration::from_secs(2)),
            Some(DragDecision::Commit(Direction::Backward))
        );
    }

    #[test]
    fn short_slow_drag_snaps_back() {
        assert_eq!(
            drag(-30.0, Duration::from_millis(600)),
            Some(DragDecision::SnapBack)
        );
    }

    #[test]
    fn fast_flick_commits() {
        // 30 px in 20 ms is 1.5 px/ms.
        assert_eq!(
            drag(-30.0, Duration::from_millis(20)),
            Some(DragDecision::Commit(Direction::Forward))
        );
    }

    #[test]
    fn tiny_twitch_never_commits() {
        assert_eq!(
            drag(6.0, Duration::from_millis(2)),
            Some(DragDecision::SnapBack)
        );
    }

    #[test]
    fn release_without_begin_is_ignored() {
        let mut tracker = tracker();
        assert_eq!(tracker.release(10.0, Instant::now()), None);
        assert_eq!(tracker.update(10.0), None);
    }

    #[test]
    fn update_reports_offset_from_origin() {
        let mut tracker = tracker();
        tracker.begin(100.0, Instant::now());
        assert_eq!(tracker.update(70.0), Some(-30.0));
        tracker.cancel();
        assert!(!tracker.is_dragging());
    }
}
