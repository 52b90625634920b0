use rewind_snapshot::{RigidbodyTarget, TransformTarget};
use rewind_value_core::{Quat, Vec3};

#[derive(Clone, Debug, PartialEq)]
pub struct MockTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for MockTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl TransformTarget for MockTransform {
    fn local_position(&self) -> Vec3 {
        self.position
    }
    fn local_rotation(&self) -> Quat {
        self.rotation
    }
    fn local_scale(&self) -> Vec3 {
        self.scale
    }
    fn set_local_position(&mut self, position: Vec3) {
        self.position = position;
    }
    fn set_local_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
    fn set_local_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }
}

/// Rigid body that remembers the largest speed ever assigned to it.
#[derive(Clone, Debug, PartialEq)]
pub struct MockRigidbody {
    pub position: Vec3,
    pub rotation: Quat,
    pub sleeping: bool,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub max_assigned_speed: f32,
    pub sleep_calls: usize,
}

impl Default for MockRigidbody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            sleeping: false,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            max_assigned_speed: 0.0,
            sleep_calls: 0,
        }
    }
}

impl MockRigidbody {
    fn note_assigned(&mut self, v: Vec3) {
        self.max_assigned_speed = self.max_assigned_speed.max(v.length());
    }
}

impl RigidbodyTarget for MockRigidbody {
    fn position(&self) -> Vec3 {
        self.position
    }
    fn rotation(&self) -> Quat {
        self.rotation
    }
    fn is_sleeping(&self) -> bool {
        self.sleeping
    }
    fn velocity(&self) -> Vec3 {
        self.velocity
    }
    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }
    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }
    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
    /// Physics engines zero the velocity of a sleeping body internally.
    fn sleep(&mut self) {
        self.sleeping = true;
        self.sleep_calls += 1;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
    fn wake_up(&mut self) {
        self.sleeping = false;
    }
    fn set_velocity(&mut self, velocity: Vec3) {
        self.note_assigned(velocity);
        self.velocity = velocity;
    }
    fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.note_assigned(angular_velocity);
        self.angular_velocity = angular_velocity;
    }
}
