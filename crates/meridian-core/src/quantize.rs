//! Attribute quantization.
//!
//! Positions are stored as `u16` triples plus a decode matrix, colors and
//! material factors as bytes, and normals as two oct-encoded bytes.

use crate::math::{Mat4, Vec2, Vec3};

/// Quantize a `0.0..=1.0` factor to a byte, clamping out-of-range input.
pub fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Quantized vertex positions with the matrix that restores them.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedPositions {
    pub positions: Vec<[u16; 3]>,
    pub decode_matrix: Mat4,
}

/// Quantize positions into the 16-bit grid spanning their bounding box.
///
/// Axes with zero extent use a unit scale so the decode matrix stays invertible.
pub fn quantize_positions(positions: &[Vec3]) -> QuantizedPositions {
    if positions.is_empty() {
        return QuantizedPositions {
            positions: Vec::new(),
            decode_matrix: Mat4::IDENTITY,
        };
    }

    let (min, max) = positions
        .iter()
        .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
            (lo.min(*p), hi.max(*p))
        });
    let extent = max - min;
    let extent = Vec3::select(extent.cmpgt(Vec3::ZERO), extent, Vec3::ONE);
    let scale = Vec3::splat(65535.0) / extent;

    let quantized = positions
        .iter()
        .map(|p| {
            let q = ((*p - min) * scale).round().clamp(Vec3::ZERO, Vec3::splat(65535.0));
            [q.x as u16, q.y as u16, q.z as u16]
        })
        .collect();

    QuantizedPositions {
        positions: quantized,
        decode_matrix: Mat4::from_translation(min) * Mat4::from_scale(extent / 65535.0),
    }
}

/// Restore one quantized position.
#[inline]
pub fn decompress_position(position: [u16; 3], decode_matrix: &Mat4) -> Vec3 {
    decode_matrix.transform_point3(Vec3::new(
        position[0] as f32,
        position[1] as f32,
        position[2] as f32,
    ))
}

/// Oct-encode a unit normal into two signed bytes.
pub fn oct_encode(normal: Vec3) -> [i8; 2] {
    let n = normal / (normal.x.abs() + normal.y.abs() + normal.z.abs()).max(f32::EPSILON);
    let mut p = Vec2::new(n.x, n.y);
    if n.z < 0.0 {
        p = Vec2::new(
            (1.0 - n.y.abs()) * sign_not_zero(n.x),
            (1.0 - n.x.abs()) * sign_not_zero(n.y),
        );
    }
    let q = (p.clamp(Vec2::splat(-1.0), Vec2::ONE) * 127.0).round();
    [q.x as i8, q.y as i8]
}

/// Decode an oct-encoded normal back into a unit vector.
pub fn oct_decode(encoded: [i8; 2]) -> Vec3 {
    let p = Vec2::new(encoded[0] as f32 / 127.0, encoded[1] as f32 / 127.0);
    let z = 1.0 - p.x.abs() - p.y.abs();
    let v = if z < 0.0 {
        Vec3::new(
            (1.0 - p.y.abs()) * sign_not_zero(p.x),
            (1.0 - p.x.abs()) * sign_not_zero(p.y),
            z,
        )
    } else {
        Vec3::new(p.x, p.y, z)
    };
    v.normalize_or_zero()
}

#[inline]
fn sign_not_zero(v: f32) -> f32 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}
