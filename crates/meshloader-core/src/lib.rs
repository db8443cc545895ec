//! Meshloader Core - Plain data types shared across the meshloader crates
//!
//! This crate provides the flat, C-compatible types that end up in the
//! buffers handed to the host application:
//! - Float tuples for positions, normals, texture coordinates and colors
//! - The single material record produced per load
//! - Math primitives (re-exported from glam)

pub mod types;

pub use glam::{Mat4, Vec2, Vec3, Vec4};
pub use types::{Material, Vec2f, Vec3f, Vec4f};
