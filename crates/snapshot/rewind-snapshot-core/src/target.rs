//! Live-target contracts. Hosts implement these for their engine objects;
//! snapshots read through them on capture and write through them on
//! apply/interpolate.

use rewind_value_core::{Color, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Scene-graph node with local TRS.
pub trait TransformTarget {
    fn local_position(&self) -> Vec3;
    fn local_rotation(&self) -> Quat;
    fn local_scale(&self) -> Vec3;

    fn set_local_position(&mut self, position: Vec3);
    fn set_local_rotation(&mut self, rotation: Quat);
    fn set_local_scale(&mut self, scale: Vec3);
}

/// Physics body. Sleep is explicit state, never encoded as zero velocity.
pub trait RigidbodyTarget {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn is_sleeping(&self) -> bool;
    fn velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);
    fn set_rotation(&mut self, rotation: Quat);
    fn sleep(&mut self);
    fn wake_up(&mut self);
    fn set_velocity(&mut self, velocity: Vec3);
    fn set_angular_velocity(&mut self, angular_velocity: Vec3);
}

/// Opaque animator state identifier (a path hash on most engines).
pub type StateId = i32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Trigger,
    Bool,
    Int,
    Float,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorParamDesc {
    pub name: String,
    pub kind: ParamKind,
}

impl AnimatorParamDesc {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Reading of one state on a layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateInfo {
    pub id: StateId,
    /// Progress in clip lengths (may exceed 1 for looping clips).
    pub normalized_time: f32,
    /// Clip length in seconds.
    pub length: f32,
}

/// Reading of an in-flight transition on a layer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransitionInfo {
    pub next: StateInfo,
    /// Transition progress in [0, 1]. Reported as exactly 0 on the tick a
    /// transition starts.
    pub normalized_time: f32,
}

/// Cross-fade request issued on apply.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CrossFade {
    pub state: StateId,
    /// Fade duration in lengths of the current state.
    pub normalized_duration: f32,
    /// Start point of the destination state in its own lengths.
    pub normalized_offset: f32,
    /// Progress the fade starts at, in [0, 1].
    pub normalized_transition_time: f32,
}

/// Layered animation state machine.
pub trait AnimatorTarget {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    /// Enabled, active and driven by a controller.
    fn is_awake(&self) -> bool;

    fn parameters(&self) -> Vec<AnimatorParamDesc>;
    fn get_bool(&self, name: &str) -> bool;
    fn get_int(&self, name: &str) -> i32;
    fn get_float(&self, name: &str) -> f32;
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);

    fn layer_count(&self) -> usize;
    fn layer_weight(&self, layer: usize) -> f32;
    fn set_layer_weight(&mut self, layer: usize, weight: f32);
    fn current_state(&self, layer: usize) -> StateInfo;
    fn transition(&self, layer: usize) -> Option<TransitionInfo>;

    fn play(&mut self, layer: usize, state: StateId, normalized_time: f32);
    fn cross_fade(&mut self, layer: usize, fade: CrossFade);
    /// Step the state machine by `dt` seconds. `update(0.0)` settles pending
    /// play/cross-fade requests without advancing time.
    fn update(&mut self, dt: f32);
}

/// Live particle with the fields a host exposes. Only the kinematic fields
/// and remaining lifetime are captured; the rest come from emission.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: f32,
    pub angular_velocity: f32,
    pub remaining_lifetime: f32,
    pub start_lifetime: f32,
    pub start_size: f32,
    pub start_color: Color,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            remaining_lifetime: 0.0,
            start_lifetime: 0.0,
            start_size: 1.0,
            start_color: Color::WHITE,
        }
    }
}

/// Particle emitter.
pub trait ParticleSystemTarget {
    fn max_particles(&self) -> usize;
    /// Copy the live particles into `out` (cleared first).
    fn get_particles(&self, out: &mut Vec<Particle>);
    /// Replace the live particles.
    fn set_particles(&mut self, particles: &[Particle]);
    fn clear(&mut self);
    fn emit(&mut self, count: usize);

    fn time(&self) -> f32;
    fn set_time(&mut self, time: f32);
    /// Main-module duration, i.e. the loop period.
    fn duration(&self) -> f32;
    /// Loops and plays on awake.
    fn is_looping(&self) -> bool;
    fn simulate(&mut self, dt: f32);

    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn stop(&mut self);
    fn emission_enabled(&self) -> bool;
    fn set_emission_enabled(&mut self, enabled: bool);
}
