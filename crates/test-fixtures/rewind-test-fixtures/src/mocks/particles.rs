use rewind_snapshot::{Particle, ParticleSystemTarget};
use rewind_value_core::{repeat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystemDef {
    pub name: String,
    pub max_particles: usize,
    /// Loop period in seconds.
    pub duration: f32,
    pub looping: bool,
    pub start_lifetime: f32,
}

/// Emitter that ages particles on `simulate` but never spawns on its own.
#[derive(Clone, Debug)]
pub struct MockParticleSystem {
    pub def: ParticleSystemDef,
    pub particles: Vec<Particle>,
    pub time: f32,
    pub playing: bool,
    pub emission: bool,
    /// Number of `play` calls received.
    pub play_calls: usize,
}

impl MockParticleSystem {
    pub fn new(def: ParticleSystemDef) -> Self {
        Self {
            def,
            particles: Vec::new(),
            time: 0.0,
            playing: false,
            emission: true,
            play_calls: 0,
        }
    }

    /// Push a particle that started `age` seconds ago, moving along +x.
    pub fn spawn(&mut self, x: f32, age: f32) {
        if self.particles.len() >= self.def.max_particles {
            return;
        }
        self.particles.push(Particle {
            position: Vec3::new(x, 0.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            rotation: 0.0,
            angular_velocity: 0.5,
            remaining_lifetime: self.def.start_lifetime - age,
            start_lifetime: self.def.start_lifetime,
            ..Particle::default()
        });
    }

    pub fn lifetimes(&self) -> Vec<f32> {
        self.particles.iter().map(|p| p.remaining_lifetime).collect()
    }
}

impl ParticleSystemTarget for MockParticleSystem {
    fn max_particles(&self) -> usize {
        self.def.max_particles
    }

    fn get_particles(&self, out: &mut Vec<Particle>) {
        out.clear();
        out.extend_from_slice(&self.particles);
    }

    fn set_particles(&mut self, particles: &[Particle]) {
        self.particles = particles
            .iter()
            .take(self.def.max_particles)
            .copied()
            .collect();
    }

    fn clear(&mut self) {
        self.particles.clear();
    }

    fn emit(&mut self, count: usize) {
        let room = self.def.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            self.particles.push(Particle {
                remaining_lifetime: self.def.start_lifetime,
                start_lifetime: self.def.start_lifetime,
                ..Particle::default()
            });
        }
    }

    fn time(&self) -> f32 {
        self.time
    }

    fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    fn duration(&self) -> f32 {
        self.def.duration
    }

    fn is_looping(&self) -> bool {
        self.def.looping
    }

    fn simulate(&mut self, dt: f32) {
        let t = self.time + dt;
        self.time = if self.def.looping {
            repeat(t, self.def.duration)
        } else {
            t.min(self.def.duration)
        };
        for p in &mut self.particles {
            p.remaining_lifetime -= dt;
            p.position = p.position.add(p.velocity.scale(dt));
            p.rotation += p.angular_velocity * dt;
        }
        self.particles.retain(|p| p.remaining_lifetime > 0.0);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
        self.play_calls += 1;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn emission_enabled(&self) -> bool {
        self.emission
    }

    fn set_emission_enabled(&mut self, enabled: bool) {
        self.emission = enabled;
    }
}
