//! Fixed-interval playback of an animation, independent of render rate
//!
//! The stepper only reads the [`AnimationSet`]; it is driven by feeding it
//! timestamps (milliseconds, any monotonic clock) from a recurring callback.

use crate::animation::AnimationSet;
use crate::frame::Frame;

/// Fraction of an interval treated as a full one when counting steps
///
/// Absorbs rounding in `now - last` when `1000 / fps` is not exact.
const STEP_TOLERANCE: f64 = 1e-6;

/// State of a running preview
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Animation being played
    pub animation_name: String,
    /// Index into the animation's frames
    pub frame_index: usize,
    /// Time accounted for but not yet consumed by a frame step
    pub accumulated_ms: f64,
    /// Timestamp of the previous `start`/`advance` call
    pub last_timestamp_ms: f64,
}

/// Drives a frame index forward at the animation's fps
#[derive(Debug, Clone, Default)]
pub struct PlaybackStepper {
    state: Option<PlaybackState>,
}

impl PlaybackStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin playing `animation_name` from its first frame
    ///
    /// Returns false (and stays stopped) if the animation is missing or has
    /// no frames.
    pub fn start(&mut self, animation_name: &str, now_ms: f64, animations: &AnimationSet) -> bool {
        let playable = animations
            .get(animation_name)
            .is_some_and(|anim| !anim.is_empty());
        if !playable {
            self.state = None;
            return false;
        }
        self.state = Some(PlaybackState {
            animation_name: animation_name.to_string(),
            frame_index: 0,
            accumulated_ms: 0.0,
            last_timestamp_ms: now_ms,
        });
        true
    }

    /// Account for the time elapsed since the last call and step frames
    ///
    /// Every full interval accumulated advances the index once, so a late
    /// callback catches up without losing time. The step count is computed
    /// in one go, so a huge gap or fps costs the same as a small one.
    /// Returns true if the frame index changed.
    pub fn advance(&mut self, now_ms: f64, animations: &AnimationSet) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        let Some(animation) = animations.get(&state.animation_name) else {
            return false;
        };
        let len = animation.len();
        if len == 0 {
            return false;
        }

        let dt = (now_ms - state.last_timestamp_ms).max(0.0);
        state.last_timestamp_ms = now_ms;
        state.accumulated_ms += dt;

        let before = state.frame_index;
        // Frames may have been removed while playing.
        state.frame_index %= len;

        let interval = animation.interval_ms();
        let steps = (state.accumulated_ms / interval + STEP_TOLERANCE).floor();
        if steps >= 1.0 {
            state.accumulated_ms = (state.accumulated_ms - steps * interval).max(0.0);
            // Saturating cast; only the step count modulo `len` matters.
            let steps = (steps as u64 % len as u64) as usize;
            state.frame_index = (state.frame_index + steps) % len;
        }
        state.frame_index != before
    }

    /// Stop playback and discard the playback state
    pub fn stop(&mut self) {
        self.state = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn frame_index(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.frame_index)
    }

    /// The frame currently shown, if playing
    pub fn current_frame<'a>(&self, animations: &'a AnimationSet) -> Option<&'a Frame> {
        let state = self.state.as_ref()?;
        let animation = animations.get(&state.animation_name)?;
        if animation.is_empty() {
            return None;
        }
        animation.frame(state.frame_index % animation.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;

    fn set_with_frames(count: usize, fps: u32) -> AnimationSet {
        let mut set = AnimationSet::new();
        let anim = set.get_or_create("walk");
        *anim = Animation::new(fps);
        for i in 0..count {
            anim.append_frame(Frame::new(i as f64 * 16.0, 0.0, 16.0, 16.0));
        }
        set
    }

    #[test]
    fn test_start_resets_state() {
        let set = set_with_frames(4, 8);
        let mut stepper = PlaybackStepper::new();
        assert!(stepper.start("walk", 1000.0, &set));
        let state = stepper.state().unwrap();
        assert_eq!(state.frame_index, 0);
        assert_eq!(state.accumulated_ms, 0.0);
        assert_eq!(state.last_timestamp_ms, 1000.0);
    }

    #[test]
    fn test_start_refuses_empty_animation() {
        let set = AnimationSet::new();
        let mut stepper = PlaybackStepper::new();
        assert!(!stepper.start("idle", 0.0, &set));
        assert!(!stepper.is_active());
        assert!(!stepper.start("missing", 0.0, &set));
    }

    #[test]
    fn test_three_intervals_advance_three_frames() {
        let set = set_with_frames(5, 8);
        let interval = set.get("walk").unwrap().interval_ms();
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);

        assert!(stepper.advance(3.0 * interval + 10.0, &set));
        let state = stepper.state().unwrap();
        assert_eq!(state.frame_index, 3);
        assert!(state.accumulated_ms < interval);
        assert!((state.accumulated_ms - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_intervals_step_exactly_three_times_at_any_fps() {
        for fps in 1..=120 {
            let set = set_with_frames(7, fps);
            let interval = set.get("walk").unwrap().interval_ms();
            for base in [0.0, 16.7, 1000.0, 123456.789, 3.6e6] {
                let mut stepper = PlaybackStepper::new();
                stepper.start("walk", base, &set);
                stepper.advance(base + 3.0 * interval, &set);
                assert_eq!(stepper.frame_index(), Some(3), "fps {fps}, base {base}");
            }
        }
    }

    #[test]
    fn test_consecutive_single_intervals_do_not_drift() {
        let set = set_with_frames(5, 7);
        let interval = set.get("walk").unwrap().interval_ms();
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        for step in 1..=20 {
            stepper.advance(step as f64 * interval, &set);
        }
        assert_eq!(stepper.frame_index(), Some(0));
    }

    #[test]
    fn test_huge_fps_advances_in_bounded_time() {
        let set = set_with_frames(3, u32::MAX);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        stepper.advance(1000.0, &set);
        stepper.advance(3.6e6, &set);
        assert!(stepper.frame_index().is_some_and(|index| index < 3));
    }

    #[test]
    fn test_long_stall_wraps_without_looping() {
        let set = set_with_frames(4, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        // A day at 100ms per frame: 864_000 steps, a multiple of 4
        assert!(!stepper.advance(86_400_000.0, &set));
        assert_eq!(stepper.frame_index(), Some(0));
    }

    #[test]
    fn test_index_wraps_modulo_length() {
        let set = set_with_frames(3, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        // 100ms interval, 4 steps over 3 frames
        stepper.advance(400.0, &set);
        assert_eq!(stepper.frame_index(), Some(1));
    }

    #[test]
    fn test_partial_intervals_accumulate() {
        let set = set_with_frames(4, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        assert!(!stepper.advance(60.0, &set));
        assert!(stepper.advance(120.0, &set));
        assert_eq!(stepper.frame_index(), Some(1));
        assert!((stepper.state().unwrap().accumulated_ms - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_clock_going_backwards_adds_no_time() {
        let set = set_with_frames(4, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 500.0, &set);
        assert!(!stepper.advance(100.0, &set));
        assert_eq!(stepper.state().unwrap().accumulated_ms, 0.0);
    }

    #[test]
    fn test_advance_after_frames_removed() {
        let mut set = set_with_frames(4, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        stepper.advance(300.0, &set);
        assert_eq!(stepper.frame_index(), Some(3));

        set.get_mut("walk").unwrap().remove_frame(3);
        set.get_mut("walk").unwrap().remove_frame(2);
        stepper.advance(300.0, &set);
        assert_eq!(stepper.frame_index(), Some(1));
    }

    #[test]
    fn test_advance_is_noop_when_emptied() {
        let mut set = set_with_frames(2, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        let walk = set.get_mut("walk").unwrap();
        while walk.remove_frame(0).is_some() {}
        assert!(!stepper.advance(1000.0, &set));
        assert_eq!(stepper.frame_index(), Some(0));
        assert!(stepper.current_frame(&set).is_none());
    }

    #[test]
    fn test_stop_discards_state() {
        let set = set_with_frames(2, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        stepper.stop();
        assert!(!stepper.is_active());
        assert!(!stepper.advance(1000.0, &set));
        assert!(stepper.frame_index().is_none());
    }

    #[test]
    fn test_current_frame_follows_index() {
        let set = set_with_frames(3, 10);
        let mut stepper = PlaybackStepper::new();
        stepper.start("walk", 0.0, &set);
        stepper.advance(200.0, &set);
        assert_eq!(stepper.current_frame(&set).unwrap().x, 32.0);
    }
}
