//! rewind-value-core: primitive value records (vector, quaternion, color),
//! scalar time helpers, and the typed binary parameter codec.
//!
//! Records are plain `Copy` data with serde derives so snapshots built from
//! them can be persisted by any serde format without embedded handles.

pub mod color;
pub mod param;
pub mod param_set;
pub mod quat;
pub mod scalar;
pub mod vector;

pub use color::Color;
pub use param::{ParamType, ParamValue, Parameter, UnknownTag};
pub use param_set::ParameterSet;
pub use quat::Quat;
pub use scalar::{finite_or, lerp_f32, normalized, repeat};
pub use vector::Vec3;
