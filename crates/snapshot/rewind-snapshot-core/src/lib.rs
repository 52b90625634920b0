//! Rewind Snapshot Core (engine-agnostic)
//!
//! Captures live simulated components into immutable records and later
//! restores or blends between two records at a fractional instant. Hosts
//! implement the traits in [`target`] for their engine objects; snapshots
//! never own or step the simulation except for the animator capture nudge.

pub mod animator;
pub mod config;
pub mod error;
pub mod frame;
pub mod particles;
pub mod rigidbody;
pub mod snapshot;
pub mod target;
pub mod transform;

// Re-exports for hosts
pub use animator::{AnimatorParam, AnimatorSnapshot, ClipTime, LayerState, LayerTransition};
pub use config::SnapshotConfig;
pub use error::SnapshotError;
pub use frame::FrameContext;
pub use particles::{ParticleRecord, ParticleSystemSnapshot};
pub use rigidbody::{BodyMotion, RigidbodySnapshot};
pub use snapshot::{ComponentSnapshot, LiveComponent, Snapshot, SnapshotKind};
pub use target::{
    AnimatorParamDesc, AnimatorTarget, CrossFade, ParamKind, Particle, ParticleSystemTarget,
    RigidbodyTarget, StateId, StateInfo, TransformTarget, TransitionInfo,
};
pub use transform::TransformSnapshot;
pub use rewind_value_core::{Color, Quat, Vec3};
