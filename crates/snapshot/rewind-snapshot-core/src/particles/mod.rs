//! Particle system snapshot.
//!
//! Particles carry no identity, so interpolation first pairs them by
//! remaining lifetime (see [`matching`]) and then re-emits the blended set.
//! Bursts (many spawns per sampling interval) cannot be told apart; keep
//! spawn rates below the capture rate or split the emitter.

pub mod matching;

use log::{debug, warn};
use rewind_value_core::{finite_or, lerp_f32, repeat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::frame::{clamp_factor, FrameContext};
use crate::snapshot::ComponentSnapshot;
use crate::target::{Particle, ParticleSystemTarget};

pub use matching::{match_particles, MatchOutcome, MatchParams};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: f32,
    pub angular_velocity: f32,
    /// Remaining lifetime in seconds.
    pub lifetime: f32,
    /// Lifetime at spawn; 0 when the host does not report it.
    #[serde(default)]
    pub start_lifetime: f32,
}

impl ParticleRecord {
    fn from_live(p: &Particle) -> Self {
        Self {
            position: p.position.sanitized(),
            velocity: p.velocity.sanitized(),
            rotation: finite_or(p.rotation, 0.0),
            angular_velocity: finite_or(p.angular_velocity, 0.0),
            lifetime: finite_or(p.remaining_lifetime, 0.0).max(0.0),
            start_lifetime: finite_or(p.start_lifetime, 0.0).max(0.0),
        }
    }

    fn write_to(&self, p: &mut Particle) {
        p.position = self.position;
        p.velocity = self.velocity;
        p.rotation = self.rotation;
        p.angular_velocity = self.angular_velocity;
        p.remaining_lifetime = self.lifetime;
        if self.start_lifetime > 0.0 {
            p.start_lifetime = self.start_lifetime;
        }
    }

    pub fn lerp(&self, other: &ParticleRecord, t: f32) -> ParticleRecord {
        ParticleRecord {
            position: self.position.lerp(other.position, t),
            velocity: self.velocity.lerp(other.velocity, t),
            rotation: lerp_f32(self.rotation, other.rotation, t),
            angular_velocity: lerp_f32(self.angular_velocity, other.angular_velocity, t),
            lifetime: lerp_f32(self.lifetime, other.lifetime, t),
            start_lifetime: self.start_lifetime,
        }
    }

    /// Would have died within `passed` seconds.
    pub fn is_expired(&self, passed: f32) -> bool {
        passed >= self.lifetime
    }

    /// Was alive `undone` seconds before it was captured. Age is
    /// `start_lifetime - lifetime`, with `fallback_total` standing in for an
    /// unknown start lifetime.
    pub fn has_spawned(&self, fallback_total: f32, undone: f32) -> bool {
        let total = if self.start_lifetime > 0.0 {
            self.start_lifetime
        } else {
            fallback_total
        };
        total - self.lifetime >= undone
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystemSnapshot {
    /// System clock (s) at capture.
    pub time: f32,
    pub playing: bool,
    pub emission_enabled: bool,
    pub particles: Vec<ParticleRecord>,
}

impl ParticleSystemSnapshot {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Move the system clock to `time` with a short forced step, the only
/// precise way most emitters allow setting absolute elapsed time.
fn kick(target: &mut dyn ParticleSystemTarget, time: f32, kick_delta_time: f32) {
    target.set_time((time - kick_delta_time).max(0.0));
    target.simulate(kick_delta_time.min(time.max(0.0)));
}

/// Clear the system and re-emit `records`, truncating to capacity.
fn emit_records(target: &mut dyn ParticleSystemTarget, records: &[ParticleRecord]) {
    let capacity = target.max_particles();
    let records = if records.len() > capacity {
        warn!(
            "{} particles recorded but system holds {capacity}; truncating",
            records.len()
        );
        &records[..capacity]
    } else {
        records
    };

    target.clear();
    target.emit(records.len());
    let mut live = Vec::with_capacity(records.len());
    target.get_particles(&mut live);
    for (record, particle) in records.iter().zip(live.iter_mut()) {
        record.write_to(particle);
    }
    live.truncate(records.len());
    target.set_particles(&live);
}

impl ComponentSnapshot for ParticleSystemSnapshot {
    type Target = dyn ParticleSystemTarget;

    fn capture(source: &mut Self::Target, _cfg: &SnapshotConfig) -> Self {
        let mut live = Vec::new();
        source.get_particles(&mut live);
        let capacity = source.max_particles();
        Self {
            time: finite_or(source.time(), 0.0),
            playing: source.is_playing(),
            emission_enabled: source.emission_enabled(),
            particles: live.iter().take(capacity).map(ParticleRecord::from_live).collect(),
        }
    }

    fn apply(&self, target: &mut Self::Target, cfg: &SnapshotConfig) -> Result<(), SnapshotError> {
        if self.playing {
            kick(target, self.time, cfg.kick_delta_time);
        }
        emit_records(target, &self.particles);
        if self.playing {
            target.play();
        }
        if target.is_looping() {
            target.set_emission_enabled(self.emission_enabled);
        } else {
            target.stop();
        }
        Ok(())
    }

    fn interpolate(
        &self,
        right: &Self,
        factor: f32,
        frame: &FrameContext,
        target: &mut Self::Target,
        cfg: &SnapshotConfig,
    ) -> Result<(), SnapshotError> {
        let t = clamp_factor(factor);
        let frame = frame.sanitized();
        let loop_duration = finite_or(target.duration(), 0.0).max(0.0);
        let looping = target.is_looping();

        let mut delta_time = frame.frame_interval;
        let mut display_time = if looping {
            repeat(self.time + frame.time_offset, loop_duration)
        } else if self.time > 0.0 {
            (self.time + frame.time_offset).clamp(0.0, loop_duration)
        } else if right.time > 0.0 {
            (right.time - frame.time_to_right).clamp(0.0, loop_duration)
        } else {
            0.0
        };
        // the source looped between the two captures
        if delta_time < 0.0 {
            display_time = repeat(lerp_f32(self.time, right.time + loop_duration, t), loop_duration);
            delta_time += loop_duration;
        }

        let outcome = match_particles(
            &self.particles,
            &right.particles,
            &MatchParams {
                factor: t,
                delta_time,
                loop_duration,
                tolerance: cfg.lifetime_match_tolerance,
            },
        );
        debug!(
            "particles: {} matched, {} expired, {} unborn, {} emitted at t={display_time}",
            outcome.matched,
            outcome.expired,
            outcome.unborn,
            outcome.particles.len()
        );

        let resume = self.playing && right.playing;
        if resume {
            kick(target, display_time, cfg.kick_delta_time);
        }
        emit_records(target, &outcome.particles);
        if resume {
            target.play();
        }
        if looping {
            let emission = if t < 0.5 {
                self.emission_enabled
            } else {
                right.emission_enabled
            };
            target.set_emission_enabled(emission);
        } else {
            target.stop();
        }
        Ok(())
    }
}
