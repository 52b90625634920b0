//! Tuning knobs shared by capture/apply/interpolate.

use serde::{Deserialize, Serialize};

/// Configuration for snapshot capture and playback.
/// Every field has a default so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Virtual time (s) an animator is stepped when a transition reports zero
    /// progress at capture.
    pub transition_nudge: f32,
    /// Length (s) of the forced simulate step used to set a particle system clock.
    pub kick_delta_time: f32,
    /// Max |left.lifetime - right.lifetime - dt| for two particles to match.
    pub lifetime_match_tolerance: f32,
    /// Transition length (s) used when it cannot be inferred at capture.
    pub fallback_transition_length: f32,
    /// Upper bound (s) on any inferred transition length.
    pub max_transition_length: f32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            transition_nudge: 0.001,
            kick_delta_time: 0.02,
            lifetime_match_tolerance: 1e-5,
            fallback_transition_length: 0.25,
            max_transition_length: 10.0,
        }
    }
}

impl SnapshotConfig {
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = SnapshotConfig::from_json_str(r#"{ "kick_delta_time": 0.05 }"#).unwrap();
        assert_eq!(cfg.kick_delta_time, 0.05);
        assert_eq!(cfg.transition_nudge, 0.001);
        assert_eq!(cfg.max_transition_length, 10.0);
    }

    #[test]
    fn unknown_json_is_rejected_as_error() {
        assert!(SnapshotConfig::from_json_str("[1, 2]").is_err());
    }
}
