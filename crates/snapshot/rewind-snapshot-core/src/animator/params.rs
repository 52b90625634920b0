use rewind_value_core::{finite_or, lerp_f32, ParamValue};
use serde::{Deserialize, Serialize};

use crate::target::{AnimatorParamDesc, AnimatorTarget, ParamKind};

/// One animator parameter packed into a 4-byte slot. Floats keep their bit
/// pattern; triggers always capture as 0 and are never re-fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatorParam {
    pub kind: ParamKind,
    pub slot: i32,
}

impl AnimatorParam {
    pub(crate) fn capture(desc: &AnimatorParamDesc, source: &dyn AnimatorTarget) -> Self {
        let slot = match desc.kind {
            ParamKind::Trigger => 0,
            ParamKind::Bool => i32::from(source.get_bool(&desc.name)),
            ParamKind::Int => source.get_int(&desc.name),
            ParamKind::Float => source.get_float(&desc.name).to_bits() as i32,
        };
        Self {
            kind: desc.kind,
            slot,
        }
    }

    pub fn as_bool(self) -> bool {
        self.slot == 1
    }

    pub fn as_float(self) -> f32 {
        finite_or(f32::from_bits(self.slot as u32), 0.0)
    }

    pub fn to_value(self) -> ParamValue {
        match self.kind {
            ParamKind::Trigger => ParamValue::Bool(false),
            ParamKind::Bool => ParamValue::Bool(self.as_bool()),
            ParamKind::Int => ParamValue::Int(self.slot),
            ParamKind::Float => ParamValue::Float(self.as_float()),
        }
    }

    pub(crate) fn apply(self, desc: &AnimatorParamDesc, target: &mut dyn AnimatorTarget) {
        match self.kind {
            ParamKind::Trigger => {}
            ParamKind::Bool => target.set_bool(&desc.name, self.as_bool()),
            ParamKind::Int => target.set_int(&desc.name, self.slot),
            ParamKind::Float => target.set_float(&desc.name, self.as_float()),
        }
    }

    /// Floats blend; everything else steps at the midpoint.
    pub(crate) fn interpolate(
        self,
        right: AnimatorParam,
        t: f32,
        desc: &AnimatorParamDesc,
        target: &mut dyn AnimatorTarget,
    ) {
        if self.kind == ParamKind::Float {
            let v = lerp_f32(self.as_float(), right.as_float(), t);
            target.set_float(&desc.name, v);
        } else if t < 0.5 {
            self.apply(desc, target);
        } else {
            right.apply(desc, target);
        }
    }
}
