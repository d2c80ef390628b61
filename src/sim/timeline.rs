//! Keyframe timeline and the pipe cycle built on it
//!
//! The pipe's horizontal motion is a short declarative sequence
//! ("snap to X", "move linearly to Y over D seconds") replayed by an explicit
//! scheduler. The scheduler only advances when the simulation hands it
//! elapsed time, so it shares the tick clock with bird physics.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SPEED, MIN_SPEED, SPEED_SCORE_CAP};
use crate::interpolate;
use crate::settings::Tuning;

/// One step of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Keyframe {
    /// Jump straight to a value (zero duration)
    Snap(f32),
    /// Move linearly from the current value to `target` over `duration` seconds
    LinearTo { target: f32, duration: f32 },
}

/// Result of advancing a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    /// Value after all keyframes reached during this advance
    pub value: f32,
    /// Last value produced by animated motion during this advance.
    /// Differs from `value` only when a snap followed the motion.
    pub swept: f32,
}

/// Scheduler replaying a list of keyframes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
    /// Index of the keyframe currently playing
    phase: usize,
    /// Seconds spent in the current phase
    elapsed: f32,
    /// Value when the current phase began
    phase_start: f32,
    value: f32,
    running: bool,
}

impl Timeline {
    /// An idle timeline holding `value`
    pub fn new(value: f32) -> Self {
        Self {
            keyframes: Vec::new(),
            phase: 0,
            elapsed: 0.0,
            phase_start: value,
            value,
            running: false,
        }
    }

    /// Start playing `keyframes` from the first one. Leading snaps apply
    /// immediately.
    pub fn play(&mut self, keyframes: Vec<Keyframe>) {
        self.keyframes = keyframes;
        self.phase = 0;
        self.elapsed = 0.0;
        self.phase_start = self.value;
        self.running = true;
        self.run(0.0);
    }

    /// Stop where we are. The value stays frozen until the next `play`.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Played through every keyframe (a cancelled timeline is not finished)
    #[inline]
    pub fn is_finished(&self) -> bool {
        !self.running && !self.keyframes.is_empty() && self.phase >= self.keyframes.len()
    }

    /// Index of the keyframe currently playing
    #[inline]
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// Advance by `dt` seconds. Non-positive or non-finite `dt` is a no-op.
    pub fn advance(&mut self, dt: f32) -> Advance {
        if !self.running || !dt.is_finite() || dt <= 0.0 {
            return Advance {
                value: self.value,
                swept: self.value,
            };
        }
        self.run(dt)
    }

    fn run(&mut self, dt: f32) -> Advance {
        let mut remaining = dt;
        let mut swept = self.value;

        while self.running {
            let Some(&keyframe) = self.keyframes.get(self.phase) else {
                self.running = false;
                break;
            };

            match keyframe {
                Keyframe::Snap(v) => {
                    self.value = v;
                    self.next_phase();
                }
                Keyframe::LinearTo { target, duration } => {
                    let left = duration - self.elapsed;
                    if left <= 0.0 {
                        self.value = target;
                        swept = target;
                        self.next_phase();
                        continue;
                    }
                    if remaining <= 0.0 {
                        break;
                    }
                    if remaining < left {
                        self.elapsed += remaining;
                        let t = self.elapsed / duration;
                        self.value = self.phase_start + (target - self.phase_start) * t;
                        swept = self.value;
                        break;
                    }
                    remaining -= left;
                    self.value = target;
                    swept = target;
                    self.next_phase();
                }
            }
        }

        Advance {
            value: self.value,
            swept,
        }
    }

    fn next_phase(&mut self) {
        self.phase += 1;
        self.elapsed = 0.0;
        self.phase_start = self.value;
    }
}

/// Pipe speed multiplier for a score: 1.0 at 0, 2.0 at 20, linear beyond
pub fn speed_multiplier(score: u32) -> f32 {
    interpolate(
        score as f32,
        (0.0, SPEED_SCORE_CAP),
        (MIN_SPEED, MAX_SPEED),
    )
}

/// Repeating horizontal sweep of the pipe pair:
/// snap to the spawn x, glide to the despawn x, snap back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipeCycle {
    timeline: Timeline,
    spawn_x: f32,
    despawn_x: f32,
    base_secs: f32,
    /// Multiplier sampled when the running sweep began
    speed: f32,
}

impl PipeCycle {
    /// Build a cycle and start its first sweep
    pub fn new(spawn_x: f32, tuning: &Tuning, speed: f32) -> Self {
        let mut cycle = Self {
            timeline: Timeline::new(spawn_x),
            spawn_x,
            despawn_x: tuning.pipe_despawn_x,
            base_secs: tuning.base_cycle_secs,
            speed,
        };
        cycle.restart(speed);
        cycle
    }

    /// Duration of a sweep at the given multiplier
    pub fn sweep_duration(&self, speed: f32) -> f32 {
        self.base_secs / speed
    }

    /// Throw away the running sweep and start a fresh one from the spawn x
    pub fn restart(&mut self, speed: f32) {
        self.speed = speed;
        let duration = self.sweep_duration(speed);
        self.timeline.play(vec![
            Keyframe::Snap(self.spawn_x),
            Keyframe::LinearTo {
                target: self.despawn_x,
                duration,
            },
            Keyframe::Snap(self.spawn_x),
        ]);
    }

    /// Advance the sweep. A sweep that runs to completion is restarted
    /// with `speed` so the pipe keeps cycling.
    pub fn advance(&mut self, dt: f32, speed: f32) -> Advance {
        let step = self.timeline.advance(dt);
        if !self.timeline.is_finished() {
            return step;
        }
        self.restart(speed);
        Advance {
            value: self.timeline.value(),
            swept: step.swept,
        }
    }

    /// Freeze the pipe in place
    pub fn cancel(&mut self) {
        self.timeline.cancel();
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.timeline.value()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.timeline.is_running()
    }

    /// Multiplier the running sweep was started with
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Duration of the running sweep
    #[inline]
    pub fn current_duration(&self) -> f32 {
        self.sweep_duration(self.speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_leading_snap_applies_on_play() {
        let mut tl = Timeline::new(0.0);
        tl.play(vec![
            Keyframe::Snap(400.0),
            Keyframe::LinearTo {
                target: -200.0,
                duration: 3.0,
            },
        ]);
        assert_eq!(tl.value(), 400.0);
        assert_eq!(tl.phase(), 1);
        assert!(tl.is_running());
    }

    #[test]
    fn test_linear_motion() {
        let mut tl = Timeline::new(0.0);
        tl.play(vec![
            Keyframe::Snap(400.0),
            Keyframe::LinearTo {
                target: -200.0,
                duration: 3.0,
            },
        ]);
        let step = tl.advance(1.5);
        assert!((step.value - 100.0).abs() < 1e-3);
        assert_eq!(step.value, step.swept);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut tl = Timeline::new(0.0);
        tl.play(vec![Keyframe::LinearTo {
            target: 10.0,
            duration: 1.0,
        }]);
        tl.advance(0.0);
        tl.advance(-1.0);
        tl.advance(f32::NAN);
        assert_eq!(tl.value(), 0.0);
    }

    #[test]
    fn test_trailing_snap_reports_swept() {
        let mut tl = Timeline::new(0.0);
        tl.play(vec![
            Keyframe::Snap(400.0),
            Keyframe::LinearTo {
                target: -200.0,
                duration: 3.0,
            },
            Keyframe::Snap(400.0),
        ]);
        let step = tl.advance(10.0);
        assert_eq!(step.value, 400.0);
        assert_eq!(step.swept, -200.0);
        assert!(!tl.is_running());
        assert!(tl.is_finished());
    }

    #[test]
    fn test_cancel_freezes_value() {
        let mut tl = Timeline::new(0.0);
        tl.play(vec![Keyframe::LinearTo {
            target: 100.0,
            duration: 1.0,
        }]);
        tl.advance(0.5);
        tl.cancel();
        let frozen = tl.value();
        tl.advance(0.5);
        assert_eq!(tl.value(), frozen);
        assert!(!tl.is_finished());
    }

    #[test]
    fn test_speed_multiplier_anchors() {
        assert_eq!(speed_multiplier(0), 1.0);
        assert!((speed_multiplier(10) - 1.5).abs() < 1e-6);
        assert!((speed_multiplier(20) - 2.0).abs() < 1e-6);
        assert!((speed_multiplier(30) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_pipe_cycle_restarts_after_full_sweep() {
        let tuning = Tuning::default();
        let mut cycle = PipeCycle::new(400.0, &tuning, 1.0);
        assert_eq!(cycle.value(), 400.0);

        let step = cycle.advance(3.5, 1.0);
        assert_eq!(step.swept, -200.0);
        assert_eq!(step.value, 400.0);
        assert!(cycle.is_running());
    }

    #[test]
    fn test_pipe_cycle_samples_speed_on_restart_only() {
        let tuning = Tuning::default();
        let mut cycle = PipeCycle::new(400.0, &tuning, 1.0);
        cycle.advance(1.0, 2.0);
        assert_eq!(cycle.speed(), 1.0);
        assert!((cycle.value() - 200.0).abs() < 1e-3);

        cycle.restart(2.0);
        assert_eq!(cycle.speed(), 2.0);
        assert!((cycle.current_duration() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_cancelled_cycle_stays_put() {
        let tuning = Tuning::default();
        let mut cycle = PipeCycle::new(400.0, &tuning, 1.0);
        cycle.advance(1.0, 1.0);
        cycle.cancel();
        let frozen = cycle.value();
        cycle.advance(1.0, 1.0);
        assert_eq!(cycle.value(), frozen);
        assert!(!cycle.is_running());
    }

    proptest! {
        #[test]
        fn prop_speed_multiplier_non_decreasing(a in 0u32..1000, b in 0u32..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(speed_multiplier(lo) <= speed_multiplier(hi));
        }

        #[test]
        fn prop_sweep_duration_non_increasing(a in 0u32..1000, b in 0u32..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let cycle = PipeCycle::new(400.0, &Tuning::default(), 1.0);
            prop_assert!(
                cycle.sweep_duration(speed_multiplier(hi))
                    <= cycle.sweep_duration(speed_multiplier(lo))
            );
        }

        #[test]
        fn prop_linear_stays_within_endpoints(dt in 0.0f32..5.0) {
            let mut tl = Timeline::new(400.0);
            tl.play(vec![Keyframe::LinearTo { target: -200.0, duration: 3.0 }]);
            let step = tl.advance(dt);
            prop_assert!(step.value <= 400.0 && step.value >= -200.0);
        }
    }
}
