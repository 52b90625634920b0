//! Temporal alignment between two snapshots and the instant being shown.

use rewind_value_core::finite_or;
use serde::{Deserialize, Serialize};

/// Passed explicitly to every interpolate call.
///
/// - `time_offset`: signed time of the interpolation instant after the left snapshot.
/// - `time_to_right`: signed time of the right snapshot after the instant.
/// - `frame_interval`: real time between the two snapshots; negative when
///   the source looped between them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameContext {
    pub time_offset: f32,
    pub time_to_right: f32,
    pub frame_interval: f32,
}

impl FrameContext {
    pub fn new(time_offset: f32, time_to_right: f32, frame_interval: f32) -> Self {
        Self {
            time_offset,
            time_to_right,
            frame_interval,
        }
        .sanitized()
    }

    /// Build from the capture times of both snapshots and the desired instant.
    pub fn from_stamps(left: f32, right: f32, instant: f32) -> Self {
        Self::new(instant - left, right - instant, right - left)
    }

    /// Blend factor of the instant between the two snapshots, in [0, 1].
    pub fn factor(&self) -> f32 {
        if self.frame_interval > 0.0 {
            (self.time_offset / self.frame_interval).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Copy with non-finite fields replaced by 0.
    pub fn sanitized(self) -> Self {
        Self {
            time_offset: finite_or(self.time_offset, 0.0),
            time_to_right: finite_or(self.time_to_right, 0.0),
            frame_interval: finite_or(self.frame_interval, 0.0),
        }
    }
}

/// Clamp an interpolation factor into [0, 1]; NaN becomes 0.
#[inline]
pub(crate) fn clamp_factor(factor: f32) -> f32 {
    finite_or(factor, 0.0).clamp(0.0, 1.0)
}
