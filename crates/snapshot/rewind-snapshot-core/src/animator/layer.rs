//! Per-layer state machine capture and reconstruction.
//!
//! A layer is either steady in one state or cross-fading to another. The
//! live source never reports a transition's total duration, so capture
//! infers it from destination progress vs. transition progress.

use std::fmt;

use log::{debug, warn};
use rewind_value_core::{finite_or, lerp_f32, normalized};
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::frame::FrameContext;
use crate::target::{AnimatorTarget, CrossFade, StateId, TransitionInfo};

/// A state and how far into it the layer is, in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipTime {
    pub state: StateId,
    pub time: f32,
    pub length: f32,
}

impl ClipTime {
    fn shifted(self, dt: f32) -> ClipTime {
        ClipTime {
            time: self.time + dt,
            ..self
        }
    }
}

/// Cross-fade in flight, in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerTransition {
    pub next_state: StateId,
    pub next_length: f32,
    pub elapsed: f32,
    pub total_length: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum LayerState {
    Steady {
        current: ClipTime,
        weight: f32,
    },
    /// `current.state != transition.next_state` always holds.
    Transitioning {
        current: ClipTime,
        weight: f32,
        transition: LayerTransition,
    },
}

impl LayerState {
    /// Builds `Transitioning`, or `Steady` when the destination is the
    /// current state.
    pub fn transitioning(current: ClipTime, weight: f32, transition: LayerTransition) -> Self {
        if transition.next_state == current.state {
            LayerState::Steady { current, weight }
        } else {
            LayerState::Transitioning {
                current,
                weight,
                transition,
            }
        }
    }

    pub fn current(&self) -> ClipTime {
        match *self {
            LayerState::Steady { current, .. } | LayerState::Transitioning { current, .. } => {
                current
            }
        }
    }

    pub fn weight(&self) -> f32 {
        match *self {
            LayerState::Steady { weight, .. } | LayerState::Transitioning { weight, .. } => weight,
        }
    }

    pub fn transition(&self) -> Option<LayerTransition> {
        match *self {
            LayerState::Steady { .. } => None,
            LayerState::Transitioning { transition, .. } => Some(transition),
        }
    }
}

/// Everything read from one layer before the source is stepped.
struct LayerReading {
    layer: usize,
    current: ClipTime,
    weight: f32,
    /// Dropped when the destination is the current state.
    reported: Option<TransitionInfo>,
    nudged: f32,
}

impl LayerReading {
    fn read(source: &dyn AnimatorTarget, layer: usize) -> Self {
        let weight = finite_or(source.layer_weight(layer), 0.0);
        let info = source.current_state(layer);
        let length = finite_or(info.length, 0.0).max(0.0);
        let current = ClipTime {
            state: info.id,
            time: finite_or(info.normalized_time * length, 0.0),
            length,
        };
        // sources may report the state being entered as its own destination
        let reported = source
            .transition(layer)
            .filter(|tr| tr.next.id != current.state);
        Self {
            layer,
            current,
            weight,
            reported,
            nudged: 0.0,
        }
    }

    fn at_zero_progress(&self) -> bool {
        matches!(self.reported, Some(tr) if tr.normalized_time == 0.0)
    }

    /// Re-read the transition after the source was stepped by `nudge`. The
    /// current state keeps its pre-nudge reading.
    fn reread(&mut self, source: &dyn AnimatorTarget, nudge: f32) {
        let Some(before) = self.reported else {
            return;
        };
        self.reported = match source.transition(self.layer) {
            Some(again) if again.next.id == before.next.id => Some(again),
            _ => None,
        };
        self.nudged = nudge;
    }

    fn into_state(self, cfg: &SnapshotConfig) -> LayerState {
        let LayerReading {
            layer,
            current,
            weight,
            reported,
            nudged,
        } = self;
        let Some(reported) = reported else {
            return LayerState::Steady { current, weight };
        };

        let next_length = finite_or(reported.next.length, 0.0).max(0.0);
        let dest_elapsed = finite_or(reported.next.normalized_time * next_length, 0.0).max(0.0);
        let progress = finite_or(reported.normalized_time, 0.0);
        let inferred = if progress > 0.0 {
            dest_elapsed / progress
        } else {
            f32::NAN
        };
        let total_length = if inferred.is_finite() && inferred > 0.0 {
            inferred.min(cfg.max_transition_length)
        } else {
            warn!(
                "layer {layer}: cannot infer transition length to state {}, using {}s",
                reported.next.id, cfg.fallback_transition_length
            );
            cfg.fallback_transition_length
        };
        let total_length = total_length.max(f32::EPSILON);

        LayerState::transitioning(
            current,
            weight,
            LayerTransition {
                next_state: reported.next.id,
                next_length,
                elapsed: (dest_elapsed - nudged).clamp(0.0, total_length),
                total_length,
            },
        )
    }
}

/// Capture every layer. All layers are read before the source is stepped,
/// and at most one nudge is applied for the whole animator.
pub(crate) fn capture_layers(source: &mut dyn AnimatorTarget, cfg: &SnapshotConfig) -> Vec<LayerState> {
    let mut readings: Vec<LayerReading> = (0..source.layer_count())
        .map(|layer| LayerReading::read(&*source, layer))
        .collect();

    if readings.iter().any(LayerReading::at_zero_progress) {
        let nudge = cfg.transition_nudge;
        source.update(nudge);
        debug!("transition at zero progress, stepped source by {nudge}s");
        for reading in readings.iter_mut().filter(|r| r.at_zero_progress()) {
            reading.reread(&*source, nudge);
        }
    }

    readings.into_iter().map(|r| r.into_state(cfg)).collect()
}

impl LayerState {
    pub(crate) fn apply(&self, target: &mut dyn AnimatorTarget, layer: usize) {
        target.set_layer_weight(layer, self.weight());
        let current = self.current();
        target.play(layer, current.state, normalized(current.time, current.length));
        target.update(0.0);
        if let Some(transition) = self.transition() {
            start_fade(target, layer, current, transition);
        }
    }

    pub(crate) fn interpolate(
        &self,
        right: &LayerState,
        t: f32,
        frame: &FrameContext,
        target: &mut dyn AnimatorTarget,
        layer: usize,
    ) {
        target.set_layer_weight(layer, lerp_f32(self.weight(), right.weight(), t));

        let left_clip = self.current();
        let right_clip = right.current();
        if left_clip.state == right_clip.state {
            let time = lerp_f32(left_clip.time, right_clip.time, t);
            target.play(layer, left_clip.state, normalized(time, left_clip.length));
        } else {
            // unrelated clips: cut to whichever was playing at the instant
            let right_time = right_clip.time - frame.time_to_right;
            if right_time > 0.0 {
                target.play(layer, right_clip.state, normalized(right_time, right_clip.length));
            } else {
                let left_time = left_clip.time + frame.time_offset;
                target.play(layer, left_clip.state, normalized(left_time, left_clip.length));
            }
        }
        target.update(0.0);

        if let Some((current, transition)) = pick_transition(self, right, t, frame) {
            start_fade(target, layer, current, transition);
        }
    }
}

/// At most one transition is rebuilt: the newer (right) one if it had begun
/// by the instant, else the older (left) one if it had not yet finished.
fn pick_transition(
    left: &LayerState,
    right: &LayerState,
    t: f32,
    frame: &FrameContext,
) -> Option<(ClipTime, LayerTransition)> {
    if let LayerState::Transitioning {
        current: rc,
        transition: rt,
        ..
    } = *right
    {
        let elapsed = rt.elapsed - frame.time_to_right;
        if elapsed >= 0.0 {
            if let LayerState::Transitioning {
                current: lc,
                transition: lt,
                ..
            } = *left
            {
                if lc.state == rc.state && lt.next_state == rt.next_state {
                    let current = ClipTime {
                        time: lerp_f32(lc.time, rc.time, t),
                        ..rc
                    };
                    let transition = LayerTransition {
                        elapsed: lerp_f32(lt.elapsed, rt.elapsed, t),
                        ..rt
                    };
                    return Some((current, transition));
                }
            }
            return Some((
                rc.shifted(-frame.time_to_right),
                LayerTransition { elapsed, ..rt },
            ));
        }
    }

    if let LayerState::Transitioning {
        current: lc,
        transition: lt,
        ..
    } = *left
    {
        let elapsed = lt.elapsed + frame.time_offset;
        if elapsed < lt.total_length {
            return Some((
                lc.shifted(frame.time_offset),
                LayerTransition { elapsed, ..lt },
            ));
        }
    }
    None
}

/// Re-play `current`, then cross-fade so a zero-length update lands the
/// destination and the fade exactly at `transition.elapsed`.
fn start_fade(
    target: &mut dyn AnimatorTarget,
    layer: usize,
    current: ClipTime,
    transition: LayerTransition,
) {
    target.play(layer, current.state, normalized(current.time, current.length));
    target.update(0.0);
    target.cross_fade(
        layer,
        CrossFade {
            state: transition.next_state,
            normalized_duration: normalized(transition.total_length, current.length),
            normalized_offset: normalized(transition.elapsed, transition.next_length),
            normalized_transition_time: normalized(transition.elapsed, transition.total_length),
        },
    );
    target.update(0.0);
}

impl fmt::Display for LayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.current();
        write!(
            f,
            "state {} at {:.3}s/{:.3}s w={:.2}",
            c.state,
            c.time,
            c.length,
            self.weight()
        )?;
        if let Some(tr) = self.transition() {
            write!(
                f,
                " -> state {} ({:.3}s/{:.3}s)",
                tr.next_state, tr.elapsed, tr.total_length
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(state: StateId, time: f32) -> ClipTime {
        ClipTime {
            state,
            time,
            length: 1.0,
        }
    }

    fn fade(next_state: StateId, elapsed: f32, total_length: f32) -> LayerTransition {
        LayerTransition {
            next_state,
            next_length: 2.0,
            elapsed,
            total_length,
        }
    }

    #[test]
    fn self_transition_collapses_to_steady() {
        let s = LayerState::transitioning(clip(3, 0.2), 1.0, fade(3, 0.1, 0.5));
        assert!(s.transition().is_none());
    }

    #[test]
    fn prefers_right_transition_once_started() {
        let left = LayerState::Steady {
            current: clip(1, 0.5),
            weight: 1.0,
        };
        let right = LayerState::transitioning(clip(1, 0.6), 1.0, fade(2, 0.08, 0.3));
        let frame = FrameContext::from_stamps(0.0, 0.1, 0.05);
        let (current, tr) = pick_transition(&left, &right, 0.5, &frame).unwrap();
        assert_eq!(tr.next_state, 2);
        assert!((tr.elapsed - 0.03).abs() < 1e-6);
        assert!((current.time - 0.55).abs() < 1e-6);
    }

    #[test]
    fn right_transition_starting_at_instant_counts_as_started() {
        let left = LayerState::Steady {
            current: clip(1, 0.5),
            weight: 1.0,
        };
        let frame = FrameContext::from_stamps(0.0, 0.1, 0.05);
        let right =
            LayerState::transitioning(clip(1, 0.6), 1.0, fade(2, frame.time_to_right, 0.3));
        let (_, tr) = pick_transition(&left, &right, 0.5, &frame).unwrap();
        assert_eq!(tr.next_state, 2);
        assert_eq!(tr.elapsed, 0.0);
    }

    #[test]
    fn right_transition_not_yet_started_is_skipped() {
        let left = LayerState::Steady {
            current: clip(1, 0.5),
            weight: 1.0,
        };
        let right = LayerState::transitioning(clip(1, 0.6), 1.0, fade(2, 0.02, 0.3));
        let frame = FrameContext::from_stamps(0.0, 0.1, 0.05);
        assert!(pick_transition(&left, &right, 0.5, &frame).is_none());
    }

    #[test]
    fn falls_back_to_unfinished_left_transition() {
        let left = LayerState::transitioning(clip(1, 0.5), 1.0, fade(2, 0.1, 0.3));
        let right = LayerState::Steady {
            current: clip(2, 0.4),
            weight: 1.0,
        };
        let frame = FrameContext::from_stamps(0.0, 0.4, 0.1);
        let (current, tr) = pick_transition(&left, &right, 0.25, &frame).unwrap();
        assert_eq!(current.state, 1);
        assert!((tr.elapsed - 0.2).abs() < 1e-6);

        let late = FrameContext::from_stamps(0.0, 0.4, 0.25);
        assert!(pick_transition(&left, &right, 0.625, &late).is_none());
    }

    #[test]
    fn same_transition_on_both_sides_is_lerped() {
        let left = LayerState::transitioning(clip(1, 0.5), 1.0, fade(2, 0.05, 0.3));
        let right = LayerState::transitioning(clip(1, 0.6), 1.0, fade(2, 0.15, 0.3));
        let frame = FrameContext::from_stamps(0.0, 0.1, 0.05);
        let (current, tr) = pick_transition(&left, &right, 0.5, &frame).unwrap();
        assert!((tr.elapsed - 0.1).abs() < 1e-6);
        assert!((current.time - 0.55).abs() < 1e-6);
    }
}
