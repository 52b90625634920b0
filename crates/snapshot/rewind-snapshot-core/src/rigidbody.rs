//! Rigid body pose plus motion. An asleep body carries no velocity data at
//! all; apply restores sleep explicitly instead of writing zero velocity.

use rewind_value_core::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::frame::{clamp_factor, FrameContext};
use crate::snapshot::ComponentSnapshot;
use crate::target::RigidbodyTarget;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum BodyMotion {
    Asleep,
    Awake { velocity: Vec3, angular_velocity: Vec3 },
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidbodySnapshot {
    pub position: Vec3,
    pub rotation: Quat,
    pub motion: BodyMotion,
}

impl RigidbodySnapshot {
    pub fn is_sleeping(&self) -> bool {
        matches!(self.motion, BodyMotion::Asleep)
    }
}

impl ComponentSnapshot for RigidbodySnapshot {
    type Target = dyn RigidbodyTarget;

    fn capture(source: &mut Self::Target, _cfg: &SnapshotConfig) -> Self {
        let motion = if source.is_sleeping() {
            BodyMotion::Asleep
        } else {
            BodyMotion::Awake {
                velocity: source.velocity().sanitized(),
                angular_velocity: source.angular_velocity().sanitized(),
            }
        };
        Self {
            position: source.position(),
            rotation: source.rotation(),
            motion,
        }
    }

    fn apply(&self, target: &mut Self::Target, _cfg: &SnapshotConfig) -> Result<(), SnapshotError> {
        target.set_position(self.position);
        target.set_rotation(self.rotation);
        match self.motion {
            BodyMotion::Asleep => target.sleep(),
            BodyMotion::Awake {
                velocity,
                angular_velocity,
            } => {
                target.wake_up();
                target.set_velocity(velocity);
                target.set_angular_velocity(angular_velocity);
            }
        }
        Ok(())
    }

    /// Pose only. Velocities jump across sleep/wake and stay with the live
    /// simulation.
    fn interpolate(
        &self,
        right: &Self,
        factor: f32,
        _frame: &FrameContext,
        target: &mut Self::Target,
        _cfg: &SnapshotConfig,
    ) -> Result<(), SnapshotError> {
        let t = clamp_factor(factor);
        target.set_position(self.position.lerp(right.position, t));
        target.set_rotation(self.rotation.slerp(right.rotation, t));
        Ok(())
    }
}
