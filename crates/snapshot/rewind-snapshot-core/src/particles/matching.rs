//! Pairing particles across two snapshots without stable identities.
//!
//! Remaining lifetime drops by exactly the elapsed time for the same
//! physical particle, so `left.lifetime - right.lifetime ≈ dt` is used as
//! identity. Several spawns inside one sampling interval with equal
//! lifetimes are indistinguishable; the first candidate wins.

use super::ParticleRecord;

/// Inputs for one matching pass.
#[derive(Copy, Clone, Debug)]
pub struct MatchParams {
    pub factor: f32,
    /// Real time between the snapshots, already corrected for loop wraps.
    pub delta_time: f32,
    /// Total lifetime for particles captured without a start lifetime.
    pub loop_duration: f32,
    pub tolerance: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchOutcome {
    pub particles: Vec<ParticleRecord>,
    pub matched: usize,
    pub expired: usize,
    pub unborn: usize,
}

#[inline]
fn is_match(left: &ParticleRecord, right: &ParticleRecord, delta_time: f32, tolerance: f32) -> bool {
    (left.lifetime - right.lifetime - delta_time).abs() < tolerance
}

/// Build the particle list at `params.factor` between `left` and `right`.
///
/// Left particles are processed last-to-first; each consumes the first
/// right particle whose lifetime matches. Unmatched left particles survive
/// if they outlive `factor * dt`; unmatched right particles are added if
/// they had spawned by the instant.
pub fn match_particles(
    left: &[ParticleRecord],
    right: &[ParticleRecord],
    params: &MatchParams,
) -> MatchOutcome {
    let mut remaining: Vec<ParticleRecord> = right.to_vec();
    let mut out = MatchOutcome {
        particles: Vec::with_capacity(left.len().max(right.len())),
        ..MatchOutcome::default()
    };

    let passed = params.factor * params.delta_time;
    for l in left.iter().rev() {
        let found = remaining
            .iter()
            .position(|r| is_match(l, r, params.delta_time, params.tolerance));
        match found {
            Some(i) => {
                let r = remaining.remove(i);
                out.particles.push(l.lerp(&r, params.factor));
                out.matched += 1;
            }
            None if l.is_expired(passed) => out.expired += 1,
            None => out.particles.push(*l),
        }
    }

    let undone = (1.0 - params.factor) * params.delta_time;
    for r in remaining {
        if r.has_spawned(params.loop_duration, undone) {
            out.particles.push(r);
        } else {
            out.unborn += 1;
        }
    }
    out
}
