//! Capability set shared by every snapshot variant, plus the tagged
//! [`Snapshot`] enum for callers that store heterogeneous components.

use serde::{Deserialize, Serialize};

use crate::animator::AnimatorSnapshot;
use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::frame::FrameContext;
use crate::particles::ParticleSystemSnapshot;
use crate::rigidbody::RigidbodySnapshot;
use crate::target::{AnimatorTarget, ParticleSystemTarget, RigidbodyTarget, TransformTarget};
use crate::transform::TransformSnapshot;

/// {Capture, Apply, Interpolate} over one kind of live target.
///
/// Capture may only touch the source through its declared stepping
/// primitive (the animator nudge); every other variant reads only.
pub trait ComponentSnapshot: Sized {
    type Target: ?Sized;

    fn capture(source: &mut Self::Target, cfg: &SnapshotConfig) -> Self;

    fn apply(&self, target: &mut Self::Target, cfg: &SnapshotConfig) -> Result<(), SnapshotError>;

    /// Write the state at `factor` between `self` (left) and `right`.
    fn interpolate(
        &self,
        right: &Self,
        factor: f32,
        frame: &FrameContext,
        target: &mut Self::Target,
        cfg: &SnapshotConfig,
    ) -> Result<(), SnapshotError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotKind {
    Transform,
    Rigidbody,
    Animator,
    ParticleSystem,
}

/// Borrowed live target of any supported kind.
pub enum LiveComponent<'a> {
    Transform(&'a mut (dyn TransformTarget + 'static)),
    Rigidbody(&'a mut (dyn RigidbodyTarget + 'static)),
    Animator(&'a mut (dyn AnimatorTarget + 'static)),
    ParticleSystem(&'a mut (dyn ParticleSystemTarget + 'static)),
}

impl LiveComponent<'_> {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            LiveComponent::Transform(_) => SnapshotKind::Transform,
            LiveComponent::Rigidbody(_) => SnapshotKind::Rigidbody,
            LiveComponent::Animator(_) => SnapshotKind::Animator,
            LiveComponent::ParticleSystem(_) => SnapshotKind::ParticleSystem,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum Snapshot {
    Transform(TransformSnapshot),
    Rigidbody(RigidbodySnapshot),
    Animator(AnimatorSnapshot),
    ParticleSystem(ParticleSystemSnapshot),
}

impl Snapshot {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Transform(_) => SnapshotKind::Transform,
            Snapshot::Rigidbody(_) => SnapshotKind::Rigidbody,
            Snapshot::Animator(_) => SnapshotKind::Animator,
            Snapshot::ParticleSystem(_) => SnapshotKind::ParticleSystem,
        }
    }

    pub fn capture(source: LiveComponent<'_>, cfg: &SnapshotConfig) -> Self {
        match source {
            LiveComponent::Transform(t) => Snapshot::Transform(TransformSnapshot::capture(t, cfg)),
            LiveComponent::Rigidbody(t) => Snapshot::Rigidbody(RigidbodySnapshot::capture(t, cfg)),
            LiveComponent::Animator(t) => Snapshot::Animator(AnimatorSnapshot::capture(t, cfg)),
            LiveComponent::ParticleSystem(t) => {
                Snapshot::ParticleSystem(ParticleSystemSnapshot::capture(t, cfg))
            }
        }
    }

    pub fn apply(&self, target: LiveComponent<'_>, cfg: &SnapshotConfig) -> Result<(), SnapshotError> {
        match (self, target) {
            (Snapshot::Transform(s), LiveComponent::Transform(t)) => s.apply(t, cfg),
            (Snapshot::Rigidbody(s), LiveComponent::Rigidbody(t)) => s.apply(t, cfg),
            (Snapshot::Animator(s), LiveComponent::Animator(t)) => s.apply(t, cfg),
            (Snapshot::ParticleSystem(s), LiveComponent::ParticleSystem(t)) => s.apply(t, cfg),
            (s, t) => Err(SnapshotError::TargetKindMismatch {
                snapshot: s.kind(),
                target: t.kind(),
            }),
        }
    }

    pub fn interpolate(
        &self,
        right: &Snapshot,
        factor: f32,
        frame: &FrameContext,
        target: LiveComponent<'_>,
        cfg: &SnapshotConfig,
    ) -> Result<(), SnapshotError> {
        if self.kind() != right.kind() {
            return Err(SnapshotError::SnapshotKindMismatch {
                left: self.kind(),
                right: right.kind(),
            });
        }
        match (self, right, target) {
            (Snapshot::Transform(l), Snapshot::Transform(r), LiveComponent::Transform(t)) => {
                l.interpolate(r, factor, frame, t, cfg)
            }
            (Snapshot::Rigidbody(l), Snapshot::Rigidbody(r), LiveComponent::Rigidbody(t)) => {
                l.interpolate(r, factor, frame, t, cfg)
            }
            (Snapshot::Animator(l), Snapshot::Animator(r), LiveComponent::Animator(t)) => {
                l.interpolate(r, factor, frame, t, cfg)
            }
            (
                Snapshot::ParticleSystem(l),
                Snapshot::ParticleSystem(r),
                LiveComponent::ParticleSystem(t),
            ) => l.interpolate(r, factor, frame, t, cfg),
            (l, _, t) => Err(SnapshotError::TargetKindMismatch {
                snapshot: l.kind(),
                target: t.kind(),
            }),
        }
    }
}
