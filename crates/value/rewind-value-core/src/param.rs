//! Named parameters carrying a typed, fixed-width binary payload.
//!
//! The codec is a closed table keyed by [`ParamType`]: each tag knows its
//! byte length and how to decode/encode its payload (little-endian).
//! Adding a type means adding an enum variant and one table row.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quat::Quat;
use crate::vector::Vec3;

/// Type tag recorded next to every payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ParamType {
    Byte = 0,
    Float = 1,
    Int = 2,
    Bool = 3,
    Vector3 = 4,
    Quaternion = 5,
}

/// Raw tag byte that does not name a [`ParamType`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("unknown parameter type tag {0}")]
pub struct UnknownTag(pub u8);

impl TryFrom<u8> for ParamType {
    type Error = UnknownTag;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Ok(match tag {
            0 => ParamType::Byte,
            1 => ParamType::Float,
            2 => ParamType::Int,
            3 => ParamType::Bool,
            4 => ParamType::Vector3,
            5 => ParamType::Quaternion,
            other => return Err(UnknownTag(other)),
        })
    }
}

/// Decoded parameter value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ParamValue {
    Byte(u8),
    Float(f32),
    Int(i32),
    Bool(bool),
    Vector3(Vec3),
    Quaternion(Quat),
}

impl ParamValue {
    #[inline]
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Byte(_) => ParamType::Byte,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Vector3(_) => ParamType::Vector3,
            ParamValue::Quaternion(_) => ParamType::Quaternion,
        }
    }
}

struct Codec {
    byte_len: usize,
    decode: fn(&[u8]) -> ParamValue,
    encode: fn(&ParamValue, &mut Vec<u8>),
}

fn read_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

fn decode_byte(b: &[u8]) -> ParamValue {
    ParamValue::Byte(b[0])
}

fn encode_byte(v: &ParamValue, out: &mut Vec<u8>) {
    if let ParamValue::Byte(x) = v {
        out.push(*x);
    }
}

fn decode_float(b: &[u8]) -> ParamValue {
    ParamValue::Float(read_f32(b, 0))
}

fn encode_float(v: &ParamValue, out: &mut Vec<u8>) {
    if let ParamValue::Float(x) = v {
        push_f32s(out, &[*x]);
    }
}

fn decode_int(b: &[u8]) -> ParamValue {
    ParamValue::Int(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn encode_int(v: &ParamValue, out: &mut Vec<u8>) {
    if let ParamValue::Int(x) = v {
        out.extend_from_slice(&x.to_le_bytes());
    }
}

fn decode_bool(b: &[u8]) -> ParamValue {
    ParamValue::Bool(b[0] != 0)
}

fn encode_bool(v: &ParamValue, out: &mut Vec<u8>) {
    if let ParamValue::Bool(x) = v {
        out.push(u8::from(*x));
    }
}

fn decode_vector3(b: &[u8]) -> ParamValue {
    ParamValue::Vector3(Vec3::new(read_f32(b, 0), read_f32(b, 4), read_f32(b, 8)))
}

fn encode_vector3(v: &ParamValue, out: &mut Vec<u8>) {
    if let ParamValue::Vector3(x) = v {
        push_f32s(out, &x.to_array());
    }
}

fn decode_quaternion(b: &[u8]) -> ParamValue {
    ParamValue::Quaternion(Quat::new(
        read_f32(b, 0),
        read_f32(b, 4),
        read_f32(b, 8),
        read_f32(b, 12),
    ))
}

fn encode_quaternion(v: &ParamValue, out: &mut Vec<u8>) {
    if let ParamValue::Quaternion(x) = v {
        push_f32s(out, &x.to_array());
    }
}

static BYTE: Codec = Codec {
    byte_len: 1,
    decode: decode_byte,
    encode: encode_byte,
};
static FLOAT: Codec = Codec {
    byte_len: 4,
    decode: decode_float,
    encode: encode_float,
};
static INT: Codec = Codec {
    byte_len: 4,
    decode: decode_int,
    encode: encode_int,
};
static BOOL: Codec = Codec {
    byte_len: 1,
    decode: decode_bool,
    encode: encode_bool,
};
static VECTOR3: Codec = Codec {
    byte_len: 12,
    decode: decode_vector3,
    encode: encode_vector3,
};
static QUATERNION: Codec = Codec {
    byte_len: 16,
    decode: decode_quaternion,
    encode: encode_quaternion,
};

impl ParamType {
    fn codec(self) -> &'static Codec {
        match self {
            ParamType::Byte => &BYTE,
            ParamType::Float => &FLOAT,
            ParamType::Int => &INT,
            ParamType::Bool => &BOOL,
            ParamType::Vector3 => &VECTOR3,
            ParamType::Quaternion => &QUATERNION,
        }
    }

    /// Payload width in bytes.
    pub fn byte_len(self) -> usize {
        self.codec().byte_len
    }

    /// Zero value of this type (identity for quaternions).
    pub fn zero(self) -> ParamValue {
        match self {
            ParamType::Byte => ParamValue::Byte(0),
            ParamType::Float => ParamValue::Float(0.0),
            ParamType::Int => ParamValue::Int(0),
            ParamType::Bool => ParamValue::Bool(false),
            ParamType::Vector3 => ParamValue::Vector3(Vec3::ZERO),
            ParamType::Quaternion => ParamValue::Quaternion(Quat::IDENTITY),
        }
    }
}

/// A named parameter: type tag plus encoded payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    ty: ParamType,
    payload: Vec<u8>,
}

impl Default for Parameter {
    fn default() -> Self {
        Parameter::new("")
    }
}

impl Parameter {
    /// Zero-valued byte parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Byte,
            payload: vec![0],
        }
    }

    /// Parameter of the given type with no payload yet; reads yield the zero value.
    pub fn with_type(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            payload: Vec::new(),
        }
    }

    /// Parameter whose tag is inferred from `value`.
    pub fn from_value(name: impl Into<String>, value: ParamValue) -> Self {
        let mut p = Parameter::new(name);
        p.set(value);
        p
    }

    /// Rebuild from a raw tag byte and payload. An unknown tag degrades to a
    /// zero byte parameter.
    pub fn from_raw(name: impl Into<String>, tag: u8, payload: &[u8]) -> Self {
        let name = name.into();
        match ParamType::try_from(tag) {
            Ok(ty) => Self {
                name,
                ty,
                payload: payload.to_vec(),
            },
            Err(err) => {
                warn!("parameter '{name}': {err}; falling back to a zero byte");
                Parameter::new(name)
            }
        }
    }

    pub fn param_type(&self) -> ParamType {
        self.ty
    }

    pub fn tag(&self) -> u8 {
        self.ty as u8
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn has_value(&self) -> bool {
        self.payload.len() >= self.ty.byte_len()
    }

    /// Decode the payload per the recorded tag.
    pub fn get(&self) -> ParamValue {
        if !self.has_value() {
            return self.ty.zero();
        }
        (self.ty.codec().decode)(&self.payload)
    }

    /// Rewrite payload and tag together.
    pub fn set(&mut self, value: ParamValue) {
        self.ty = value.param_type();
        self.payload.clear();
        (self.ty.codec().encode)(&value, &mut self.payload);
    }
}
