//! Animator snapshot: parameters plus per-layer state machine position.

pub mod layer;
pub mod params;

use std::fmt;

use rewind_value_core::{Parameter, ParameterSet};
use serde::{Deserialize, Serialize};

use crate::config::SnapshotConfig;
use crate::error::SnapshotError;
use crate::frame::{clamp_factor, FrameContext};
use crate::snapshot::ComponentSnapshot;
use crate::target::{AnimatorParamDesc, AnimatorTarget};

pub use layer::{ClipTime, LayerState, LayerTransition};
pub use params::AnimatorParam;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorSnapshot {
    pub enabled: bool,
    /// Captured while not awake; no parameters or layers are stored.
    pub sleeping: bool,
    pub params: Vec<AnimatorParam>,
    pub layers: Vec<LayerState>,
}

impl AnimatorSnapshot {
    /// Fail fast when the target was built from a different controller.
    fn check_shape(&self, descs: &[AnimatorParamDesc], layer_count: usize) -> Result<(), SnapshotError> {
        if descs.len() != self.params.len() {
            return Err(SnapshotError::ParameterCountMismatch {
                snapshot: self.params.len(),
                target: descs.len(),
            });
        }
        for (index, (param, desc)) in self.params.iter().zip(descs).enumerate() {
            if param.kind != desc.kind {
                return Err(SnapshotError::ParameterKindMismatch {
                    index,
                    snapshot: param.kind,
                    target: desc.kind,
                });
            }
        }
        if layer_count != self.layers.len() {
            return Err(SnapshotError::LayerCountMismatch {
                snapshot: self.layers.len(),
                target: layer_count,
            });
        }
        Ok(())
    }

    /// Captured parameters as a named set, using the target's descriptors for names.
    pub fn parameter_set(&self, descs: &[AnimatorParamDesc]) -> ParameterSet {
        self.params
            .iter()
            .zip(descs)
            .map(|(p, d)| Parameter::from_value(d.name.clone(), p.to_value()))
            .collect::<Vec<_>>()
            .into()
    }
}

impl ComponentSnapshot for AnimatorSnapshot {
    type Target = dyn AnimatorTarget;

    /// May step the source by `cfg.transition_nudge` when a layer reports a
    /// transition at zero progress.
    fn capture(source: &mut Self::Target, cfg: &SnapshotConfig) -> Self {
        let enabled = source.is_enabled();
        if !source.is_awake() {
            return Self {
                enabled,
                sleeping: true,
                params: Vec::new(),
                layers: Vec::new(),
            };
        }

        let descs = source.parameters();
        let params = descs
            .iter()
            .map(|desc| AnimatorParam::capture(desc, &*source))
            .collect();
        let layers = layer::capture_layers(source, cfg);

        Self {
            enabled,
            sleeping: false,
            params,
            layers,
        }
    }

    fn apply(&self, target: &mut Self::Target, _cfg: &SnapshotConfig) -> Result<(), SnapshotError> {
        target.set_enabled(self.enabled);
        if self.sleeping || !target.is_awake() {
            return Ok(());
        }

        let descs = target.parameters();
        self.check_shape(&descs, target.layer_count())?;

        for (param, desc) in self.params.iter().zip(&descs) {
            param.apply(desc, target);
        }
        for (layer, state) in self.layers.iter().enumerate() {
            state.apply(target, layer);
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
        // no blending across an activation boundary
        match (self.sleeping, right.sleeping) {
            (true, true) => return Ok(()),
            (true, false) => return right.apply(target, cfg),
            (false, true) => return self.apply(target, cfg),
            (false, false) => {}
        }

        let t = clamp_factor(factor);
        let frame = frame.sanitized();
        target.set_enabled(if t < 0.5 { self.enabled } else { right.enabled });
        if !target.is_awake() {
            return Ok(());
        }

        let descs = target.parameters();
        let layer_count = target.layer_count();
        self.check_shape(&descs, layer_count)?;
        right.check_shape(&descs, layer_count)?;

        for ((l, r), desc) in self.params.iter().zip(&right.params).zip(&descs) {
            l.interpolate(*r, t, desc, target);
        }
        for (layer, (l, r)) in self.layers.iter().zip(&right.layers).enumerate() {
            l.interpolate(r, t, &frame, target, layer);
        }
        Ok(())
    }
}

impl fmt::Display for AnimatorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Animator: ")?;
        if self.sleeping {
            write!(f, "sleeping ")?;
        }
        write!(f, "{}", if self.enabled { "active" } else { "inactive" })?;
        match self.layers.first() {
            Some(first) => write!(f, " - layer 0: {first}"),
            None => write!(f, " - empty"),
        }
    }
}
