//! In-memory live targets. They follow the host contracts closely enough
//! for round-trip and interpolation checks but simulate nothing beyond
//! clock advance and particle aging.

mod animator;
mod bodies;
mod particles;

pub use animator::{ControllerDef, LayerDef, MockAnimator, StateDef};
pub use bodies::{MockRigidbody, MockTransform};
pub use particles::{MockParticleSystem, ParticleSystemDef};
