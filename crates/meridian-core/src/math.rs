/// SIMD-accelerated `glam` types for CPU-side math.
///
/// The render layer mixes `f32` matrices (what the GPU sees) with `f64`
/// vectors (the relative-to-center origin of a layer), so both families are
/// re-exported here.
///
/// ```
/// use meridian_core::math::{DVec3, Mat4, Vec3};
///
/// let origin = DVec3::new(1.0e7, 0.0, 0.0);
/// let local = Mat4::from_translation(Vec3::X).transform_point3(Vec3::ZERO);
/// assert_eq!(origin + local.as_dvec3(), DVec3::new(1.0e7 + 1.0, 0.0, 0.0));
/// ```
pub mod fast {
    pub use glam::*;
}

/// Packed vector types for GPU buffer uploads.
///
/// These are `#[repr(C)]` and [`Pod`](bytemuck::Pod), so arrays of them can be
/// cast straight to bytes with `bytemuck::cast_slice`.
pub mod packed {
    use bytemuck::{Pod, Zeroable};

    /// A 2D vector with guaranteed `#[repr(C)]` layout (8 bytes).
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec2 {
        pub x: f32,
        pub y: f32,
    }

    /// A 3D vector with guaranteed `#[repr(C)]` layout (12 bytes, no padding).
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec3 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }

    /// A 4D vector with guaranteed `#[repr(C)]` layout (16 bytes).
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
    pub struct Vec4 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub w: f32,
    }

    static_assertions::assert_eq_size!(Vec2, [f32; 2]);
    static_assertions::assert_eq_size!(Vec3, [f32; 3]);
    static_assertions::assert_eq_size!(Vec4, [f32; 4]);

    impl From<glam::Vec2> for Vec2 {
        fn from(v: glam::Vec2) -> Self {
            Self { x: v.x, y: v.y }
        }
    }

    impl From<glam::Vec3> for Vec3 {
        fn from(v: glam::Vec3) -> Self {
            Self { x: v.x, y: v.y, z: v.z }
        }
    }

    impl From<glam::Vec4> for Vec4 {
        fn from(v: glam::Vec4) -> Self {
            Self { x: v.x, y: v.y, z: v.z, w: v.w }
        }
    }
}

pub use fast::*;
pub use packed::{Vec2 as PackedVec2, Vec3 as PackedVec3, Vec4 as PackedVec4};

/// Split an affine matrix into the three rows the instancing shaders read.
///
/// The fourth row of an affine transform is always `(0, 0, 0, 1)`, so only
/// the first three rows are stored per instance. Each packed vector holds one
/// row: `(m[0][i], m[1][i], m[2][i], m[3][i])` in column-major terms.
pub fn affine_rows(matrix: &Mat4) -> [PackedVec4; 3] {
    [
        matrix.row(0).into(),
        matrix.row(1).into(),
        matrix.row(2).into(),
    ]
}

/// Inverse-transpose of `matrix`, used to carry normals through a model transform.
pub fn normal_matrix(matrix: &Mat4) -> Mat4 {
    matrix.inverse().transpose()
}

/// An axis-aligned bounding box in double precision.
///
/// A freshly created box is *empty* (min = +inf, max = -inf) and grows as
/// points are added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    pub min: DVec3,
    pub max: DVec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb3 {
    pub const EMPTY: Self = Self {
        min: DVec3::splat(f64::INFINITY),
        max: DVec3::splat(f64::NEG_INFINITY),
    };

    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.expand_point(p);
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_point(&mut self, point: DVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn expand_aabb(&mut self, other: &Aabb3) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// True if `other` lies entirely inside this box. The empty box is
    /// contained by everything.
    pub fn contains_aabb(&self, other: &Aabb3) -> bool {
        if other.is_empty() {
            return true;
        }
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    pub fn contains_point(&self, point: DVec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// The eight corners, in `x`-fastest order.
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }
}
