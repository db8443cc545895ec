//! Flat vertex attribute and material types
//!
//! Every type here is `#[repr(C)]` and `Pod`, so a `Vec` of them can be
//! handed across the FFI boundary without conversion.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

/// Three floats: a position or a normal
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec3f {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3f {
    pub const ZERO: Vec3f = Vec3f::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Convert to an array [x, y, z]
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean length
    pub fn length(&self) -> f32 {
        Vec3::from(*self).length()
    }
}

impl From<Vec3> for Vec3f {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3f> for Vec3 {
    fn from(v: Vec3f) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vec3f {
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// Two floats: a texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec2f {
    pub u: f32,
    pub v: f32,
}

impl Vec2f {
    pub const ZERO: Vec2f = Vec2f::new(0.0, 0.0);

    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

impl From<Vec2> for Vec2f {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Four floats: an RGBA vertex color
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vec4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Vec4f {
    pub const WHITE: Vec4f = Vec4f::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Vec4> for Vec4f {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

/// Phong-style material record. One per load; zero until a mesh sets it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Material {
    pub ambient: Vec3f,
    pub diffuse: Vec3f,
    pub specular: Vec3f,
    pub shininess: f32,
}

impl Material {
    /// True when no field has been written yet
    pub fn is_unset(&self) -> bool {
        *self == Material::default()
    }
}
