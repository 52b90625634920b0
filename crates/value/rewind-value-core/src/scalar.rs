//! Scalar helpers shared by every record and snapshot variant.

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Replace NaN/inf with `fallback`.
#[inline]
pub fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// Wrap `t` into `[0, length)`. A non-positive or non-finite length yields 0.
pub fn repeat(t: f32, length: f32) -> f32 {
    if !(length > 0.0) || !length.is_finite() || !t.is_finite() {
        return 0.0;
    }
    let m = t % length;
    let wrapped = if m < 0.0 { m + length } else { m };
    // `m + length` can round up to `length` for tiny negative m
    if wrapped >= length {
        0.0
    } else {
        wrapped
    }
}

/// `time / length`, or 0 when the length is degenerate.
#[inline]
pub fn normalized(time: f32, length: f32) -> f32 {
    if length > 0.0 && length.is_finite() {
        finite_or(time / length, 0.0)
    } else {
        0.0
    }
}
