//! Owned buffers handed across the C boundary

use std::ptr;

use meshloader_assets::FlatMesh;
use meshloader_core::{Material, Vec2f, Vec3f, Vec4f};

/// A heap array plus its element count.
///
/// The receiver owns the allocation and must give it back through
/// `free_mesh_data`. The empty slice is `{ NULL, 0 }`. There is no `Drop`
/// impl: the handle is plain data on both sides of the boundary.
#[repr(C)]
#[derive(Debug)]
pub struct Slice<T> {
    pub data: *mut T,
    pub len: usize,
}

impl<T> Slice<T> {
    pub const fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }

    /// Move a vector's contents into an exactly sized heap allocation.
    pub fn from_vec(values: Vec<T>) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        let boxed = values.into_boxed_slice();
        let len = boxed.len();
        let data = Box::into_raw(boxed) as *mut T;
        Self { data, len }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_null() || self.len == 0
    }

    /// View the buffer.
    ///
    /// # Safety
    /// The slice must be empty or come from [`Slice::from_vec`] and not have
    /// been released.
    pub unsafe fn as_slice(&self) -> &[T] {
        if self.is_empty() {
            &[]
        } else {
            std::slice::from_raw_parts(self.data, self.len)
        }
    }

    /// Free the allocation and reset to the empty state.
    ///
    /// # Safety
    /// The slice must be empty or come from [`Slice::from_vec`]. Calling this
    /// again afterwards is a no-op.
    pub unsafe fn release(&mut self) {
        if !self.data.is_null() {
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
                self.data, self.len,
            )));
        }
        self.data = ptr::null_mut();
        self.len = 0;
    }
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Result of a load: five buffers and the single material.
///
/// On failure every buffer is empty and the material is zeroed.
#[repr(C)]
#[derive(Debug, Default)]
pub struct MeshData {
    pub vertices: Slice<Vec3f>,
    pub normals: Slice<Vec3f>,
    pub tex_coords: Slice<Vec2f>,
    pub colors: Slice<Vec4f>,
    pub indices: Slice<i32>,
    pub material: Material,
}

impl MeshData {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Hand the flattened buffers over to caller-owned allocations.
    pub fn from_flat(mesh: FlatMesh) -> Self {
        Self {
            vertices: Slice::from_vec(mesh.vertices),
            normals: Slice::from_vec(mesh.normals),
            tex_coords: Slice::from_vec(mesh.tex_coords),
            colors: Slice::from_vec(mesh.colors),
            indices: Slice::from_vec(mesh.indices),
            material: mesh.material,
        }
    }

    /// True when every buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
            && self.normals.is_empty()
            && self.tex_coords.is_empty()
            && self.colors.is_empty()
            && self.indices.is_empty()
    }

    /// Free all five buffers and reset them to empty.
    ///
    /// # Safety
    /// Every buffer must be empty or have been produced by
    /// [`MeshData::from_flat`].
    pub unsafe fn release(&mut self) {
        self.vertices.release();
        self.normals.release();
        self.tex_coords.release();
        self.colors.release();
        self.indices.release();
    }
}
