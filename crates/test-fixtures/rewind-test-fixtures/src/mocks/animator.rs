use rewind_snapshot::{
    AnimatorParamDesc, AnimatorTarget, CrossFade, ParamKind, StateId, StateInfo, TransitionInfo,
};
use rewind_value_core::ParamValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub id: StateId,
    pub name: String,
    pub length: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    pub name: String,
    pub default_state: StateId,
    #[serde(default = "one")]
    pub weight: f32,
}

fn one() -> f32 {
    1.0
}

/// Static description of an animator controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerDef {
    pub name: String,
    pub states: Vec<StateDef>,
    pub layers: Vec<LayerDef>,
    #[serde(default)]
    pub parameters: Vec<AnimatorParamDesc>,
}

impl ControllerDef {
    pub fn state_length(&self, id: StateId) -> f32 {
        self.states
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.length)
            .unwrap_or(0.0)
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().find(|s| s.name == name).map(|s| s.id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Fade {
    next: StateId,
    /// Seconds into the destination state.
    next_time: f32,
    elapsed: f32,
    duration: f32,
    /// Progress is reported as 0 until the first update after the fade began.
    started: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Layer {
    weight: f32,
    state: StateId,
    /// Seconds into `state`, unwrapped.
    time: f32,
    fade: Option<Fade>,
}

/// Layered state machine with explicit cross-fades only (no automatic
/// transition graph). Clips never wrap their reported time.
#[derive(Clone, Debug)]
pub struct MockAnimator {
    pub controller: ControllerDef,
    pub enabled: bool,
    /// Host-side activity (game object active); awake = enabled && active.
    pub active: bool,
    values: Vec<ParamValue>,
    layers: Vec<Layer>,
    /// Total simulated seconds passed to `update`.
    pub updated_for: f32,
}

impl MockAnimator {
    pub fn new(controller: ControllerDef) -> Self {
        let values = controller
            .parameters
            .iter()
            .map(|p| match p.kind {
                ParamKind::Float => ParamValue::Float(0.0),
                ParamKind::Int => ParamValue::Int(0),
                ParamKind::Bool | ParamKind::Trigger => ParamValue::Bool(false),
            })
            .collect();
        let layers = controller
            .layers
            .iter()
            .map(|l| Layer {
                weight: l.weight,
                state: l.default_state,
                time: 0.0,
                fade: None,
            })
            .collect();
        Self {
            controller,
            enabled: true,
            active: true,
            values,
            layers,
            updated_for: 0.0,
        }
    }

    fn slot(&self, name: &str) -> Option<usize> {
        self.controller.parameters.iter().position(|p| p.name == name)
    }

    fn write(&mut self, name: &str, value: ParamValue) {
        if let Some(i) = self.slot(name) {
            self.values[i] = value;
        }
    }

    /// Start a fade of `duration` seconds from the current state on this
    /// tick, as a controller transition would; progress reads 0 until the
    /// next update.
    pub fn begin_transition(&mut self, layer: usize, next: StateId, duration: f32) {
        if let Some(l) = self.layers.get_mut(layer) {
            l.fade = Some(Fade {
                next,
                next_time: 0.0,
                elapsed: 0.0,
                duration,
                started: false,
            });
        }
    }

    /// Seconds into the current state of `layer`.
    pub fn state_time(&self, layer: usize) -> f32 {
        self.layers.get(layer).map(|l| l.time).unwrap_or(0.0)
    }

    /// Elapsed and total seconds of the fade on `layer`, if any.
    pub fn fade_progress(&self, layer: usize) -> Option<(StateId, f32, f32)> {
        self.layers
            .get(layer)
            .and_then(|l| l.fade)
            .map(|f| (f.next, f.elapsed, f.duration))
    }
}

impl AnimatorTarget for MockAnimator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_awake(&self) -> bool {
        self.enabled && self.active
    }

    fn parameters(&self) -> Vec<AnimatorParamDesc> {
        self.controller.parameters.clone()
    }

    fn get_bool(&self, name: &str) -> bool {
        matches!(
            self.slot(name).map(|i| self.values[i]),
            Some(ParamValue::Bool(true))
        )
    }

    fn get_int(&self, name: &str) -> i32 {
        match self.slot(name).map(|i| self.values[i]) {
            Some(ParamValue::Int(v)) => v,
            _ => 0,
        }
    }

    fn get_float(&self, name: &str) -> f32 {
        match self.slot(name).map(|i| self.values[i]) {
            Some(ParamValue::Float(v)) => v,
            _ => 0.0,
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.write(name, ParamValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.write(name, ParamValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.write(name, ParamValue::Float(value));
    }

    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_weight(&self, layer: usize) -> f32 {
        self.layers.get(layer).map(|l| l.weight).unwrap_or(0.0)
    }

    fn set_layer_weight(&mut self, layer: usize, weight: f32) {
        if let Some(l) = self.layers.get_mut(layer) {
            l.weight = weight;
        }
    }

    fn current_state(&self, layer: usize) -> StateInfo {
        let Some(l) = self.layers.get(layer) else {
            return StateInfo {
                id: 0,
                normalized_time: 0.0,
                length: 0.0,
            };
        };
        let length = self.controller.state_length(l.state);
        StateInfo {
            id: l.state,
            normalized_time: if length > 0.0 { l.time / length } else { 0.0 },
            length,
        }
    }

    fn transition(&self, layer: usize) -> Option<TransitionInfo> {
        let fade = self.layers.get(layer)?.fade?;
        let next_length = self.controller.state_length(fade.next);
        let progress = if fade.started && fade.duration > 0.0 {
            fade.elapsed / fade.duration
        } else {
            0.0
        };
        Some(TransitionInfo {
            next: StateInfo {
                id: fade.next,
                normalized_time: if next_length > 0.0 {
                    fade.next_time / next_length
                } else {
                    0.0
                },
                length: next_length,
            },
            normalized_time: progress,
        })
    }

    fn play(&mut self, layer: usize, state: StateId, normalized_time: f32) {
        let length = self.controller.state_length(state);
        if let Some(l) = self.layers.get_mut(layer) {
            l.state = state;
            l.time = normalized_time * length;
            l.fade = None;
        }
    }

    fn cross_fade(&mut self, layer: usize, fade: CrossFade) {
        let next_length = self.controller.state_length(fade.state);
        let Some(l) = self.layers.get_mut(layer) else {
            return;
        };
        let current_length = self.controller.state_length(l.state);
        let duration = fade.normalized_duration * current_length;
        l.fade = Some(Fade {
            next: fade.state,
            next_time: fade.normalized_offset * next_length,
            elapsed: fade.normalized_transition_time * duration,
            duration,
            started: false,
        });
    }

    fn update(&mut self, dt: f32) {
        self.updated_for += dt;
        for l in &mut self.layers {
            l.time += dt;
            let Some(mut fade) = l.fade else {
                continue;
            };
            fade.started = true;
            fade.elapsed += dt;
            fade.next_time += dt;
            if dt > 0.0 && fade.elapsed >= fade.duration {
                l.state = fade.next;
                l.time = fade.next_time;
                l.fade = None;
            } else {
                l.fade = Some(fade);
            }
        }
    }
}
