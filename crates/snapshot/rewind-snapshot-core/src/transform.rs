use rewind_value_core::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::frame::{clamp_factor, FrameContext};
use crate::snapshot::ComponentSnapshot;
use crate::target::TransformTarget;

/// Local TRS of a scene node.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformSnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl TransformSnapshot {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }
}

impl ComponentSnapshot for TransformSnapshot {
    type Target = dyn TransformTarget;

    fn capture(source: &mut Self::Target, _cfg: &SnapshotConfig) -> Self {
        Self::new(
            source.local_position(),
            source.local_rotation(),
            source.local_scale(),
        )
    }

    fn apply(&self, target: &mut Self::Target, _cfg: &SnapshotConfig) -> Result<(), SnapshotError> {
        target.set_local_position(self.position);
        target.set_local_rotation(self.rotation);
        target.set_local_scale(self.scale);
        Ok(())
    }

    fn interpolate(
        &self,
        right: &Self,
        factor: f32,
        _frame: &FrameContext,
        target: &mut Self::Target,
        _cfg: &SnapshotConfig,
    ) -> Result<(), SnapshotError> {
        let t = clamp_factor(factor);
        target.set_local_position(self.position.lerp(right.position, t));
        target.set_local_rotation(self.rotation.slerp(right.rotation, t));
        target.set_local_scale(self.scale.lerp(right.scale, t));
        Ok(())
    }
}
