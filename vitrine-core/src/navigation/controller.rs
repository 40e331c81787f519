use tracing::trace;
use vitrine_model::{SlideCount, SlideCounter, SlideNumber};

use crate::transition::TransitionPhase;

/// Source of truth for the displayed slide and the single transition slot.
#[derive(Debug, Clone)]
pub struct SlideController {
    current: SlideNumber,
    total: SlideCount,
    phase: TransitionPhase,
}

impl SlideController {
    /// Starts at the slide named by `requested`, clamped into range. Text
    /// without a leading integer starts at slide 1.
    pub fn initialize(requested: Option<&str>, total: SlideCount) -> Self {
        Self::starting_at(SlideNumber::parse_clamped(requested, total), total)
    }

    pub fn starting_at(current: SlideNumber, total: SlideCount) -> Self {
        let current = SlideNumber::clamped(i64::from(current.get()), total);
        Self {
            current,
            total,
            phase: TransitionPhase::Idle,
        }
    }

    pub fn current(&self) -> SlideNumber {
        self.current
    }

    pub fn total(&self) -> SlideCount {
        self.total
    }

    pub fn counter(&self) -> SlideCounter {
        SlideCounter::new(self.current, self.total)
    }

    /// Moves by `delta`, wrapping modulo the collection size.
    pub fn advance(&mut self, delta: i64) -> SlideNumber {
        self.current = self.current.offset(delta, self.total);
        self.current
    }

    pub fn next(&mut self) -> SlideNumber {
        self.advance(1)
    }

    pub fn previous(&mut self) -> SlideNumber {
        self.advance(-1)
    }

    /// Jumps to `slide`, clamped into range.
    pub fn go_to(&mut self, slide: SlideNumber) -> SlideNumber {
        self.current = SlideNumber::clamped(i64::from(slide.get()), self.total);
        self.current
    }

    /// `(previous, next)` around the current slide.
    pub fn neighbours(&self) -> (SlideNumber, SlideNumber) {
        (
            self.current.offset(-1, self.total),
            self.current.offset(1, self.total),
        )
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_transitioning(&self) -> bool {
        self.phase == TransitionPhase::Animating
    }

    /// Claims the transition slot. Returns `false`, changing nothing, when a
    /// transition is already in flight.
    pub fn begin_transition(&mut self) -> bool {
        if self.is_transitioning() {
            trace!(current = %self.current, "transition already in flight");
            return false;
        }
        self.phase = TransitionPhase::Animating;
        true
    }

    pub fn end_transition(&mut self) {
        self.phase = TransitionPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forty() -> SlideCount {
        SlideCount::new(40).unwrap()
    }

    #[test]
    fn initialize_clamps_and_defaults() {
        let total = forty();
        let cases = [
            (Some("0"), 1),
            (Some("999"), 40),
            (Some("17"), 17),
            (Some("17abc"), 17),
            (Some("3.9"), 3),
            (Some("abc"), 1),
            (Some(""), 1),
            (Some("-4"), 1),
            (None, 1),
        ];
        for (raw, expected) in cases {
            let controller = SlideController::initialize(raw, total);
            assert_eq!(controller.current().get(), expected, "input {raw:?}");
        }
    }

    #[test]
    fn forty_steps_forward_return_to_the_first_slide() {
        let mut controller = SlideController::initialize(None, forty());
        for _ in 0..40 {
            controller.next();
        }
        assert_eq!(controller.current().get(), 1);
    }

    #[test]
    fn previous_from_first_wraps_to_last() {
        let mut controller = SlideController::initialize(Some("1"), forty());
        assert_eq!(controller.previous().get(), 40);
    }

    #[test]
    fn advance_stays_in_range_for_any_delta() {
        let total = forty();
        for start in [1u32, 2, 20, 39, 40] {
            for delta in [
                i64::MIN,
                -1_000_003,
                -81,
                -40,
                -1,
                0,
                1,
                39,
                40,
                41,
                7_777_777,
                i64::MAX,
            ] {
                let mut controller = SlideController::starting_at(
                    SlideNumber::new(start).unwrap(),
                    total,
                );
                let landed = controller.advance(delta);
                assert!(total.contains(landed), "{start} + {delta} -> {landed}");
            }
        }
    }

    #[test]
    fn next_and_previous_are_inverse() {
        let total = forty();
        for start in total.iter() {
            let mut controller = SlideController::starting_at(start, total);
            controller.next();
            controller.previous();
            assert_eq!(controller.current(), start);
            controller.previous();
            controller.next();
            assert_eq!(controller.current(), start);
        }
    }

    #[test]
    fn go_to_clamps() {
        let mut controller = SlideController::initialize(None, forty());
        assert_eq!(controller.go_to(SlideNumber::new(77).unwrap()).get(), 40);
        assert_eq!(controller.go_to(SlideNumber::new(12).unwrap()).get(), 12);
    }

    #[test]
    fn neighbours_wrap() {
        let controller = SlideController::initialize(Some("40"), forty());
        let (previous, next) = controller.neighbours();
        assert_eq!((previous.get(), next.get()), (39, 1));
    }

    #[test]
    fn transition_slot_is_single() {
        let mut controller = SlideController::initialize(None, forty());
        assert!(controller.begin_transition());
        assert!(!controller.begin_transition());
        assert!(controller.is_transitioning());
        controller.end_transition();
        assert!(!controller.is_transitioning());
        assert!(controller.begin_transition());
    }

    #[test]
    fn counter_renders_position() {
        let controller = SlideController::initialize(Some("7"), forty());
        assert_eq!(controller.counter().to_string(), "7 / 40");
    }
}
