//! Meshloader FFI - C ABI over the meshloader loading pipeline
//!
//! ```c
//! MeshData mesh = load_mesh_data("model.glb");
//! if (mesh.vertices.len == 0) { /* load failed, see stderr */ }
//! /* ... upload buffers ... */
//! free_mesh_data(&mesh);
//! ```
//!
//! Buffers returned by a load belong to the caller until released with
//! `free_mesh_data`. Failures never unwind across the boundary; they come
//! back as an all-empty `MeshData` with the reason logged to stderr.

mod logging;
mod slice;

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use meshloader_assets::{load_mesh, LoaderConfig, PostProcess};
use tracing::error;

pub use logging::LOG_ENV;
pub use slice::{MeshData, Slice};

fn load_with_config(filename: *const c_char, config: LoaderConfig) -> MeshData {
    logging::init();

    if filename.is_null() {
        error!("load_mesh_data called with a null filename");
        return MeshData::empty();
    }
    // SAFETY: non-null and documented as a NUL-terminated string.
    let Ok(path) = unsafe { CStr::from_ptr(filename) }.to_str() else {
        error!("load_mesh_data: filename is not valid UTF-8");
        return MeshData::empty();
    };

    match panic::catch_unwind(AssertUnwindSafe(|| load_mesh(Path::new(path), &config))) {
        Ok(Ok(mesh)) => MeshData::from_flat(mesh),
        Ok(Err(_)) => MeshData::empty(),
        Err(_) => {
            error!("Loading '{}' panicked", path);
            MeshData::empty()
        }
    }
}

/// Load a model and flatten it into caller-owned buffers.
///
/// Uses the default post-processing (triangulate, flip UVs, generate smooth
/// normals) and the padded attribute layout.
///
/// # Safety
/// `filename` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn load_mesh_data(filename: *const c_char) -> MeshData {
    load_with_config(filename, LoaderConfig::default())
}

/// Like [`load_mesh_data`] with an explicit post-processing bitmask.
///
/// Recognised bits: `0x8` triangulate, `0x40` generate smooth normals,
/// `0x800000` flip UVs. Other bits are ignored.
///
/// # Safety
/// `filename` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn load_mesh_data_with_flags(
    filename: *const c_char,
    flags: u32,
) -> MeshData {
    let config = LoaderConfig::with_post_process(PostProcess::from_bits_truncate(flags));
    load_with_config(filename, config)
}

/// Release the buffers of a `MeshData` and reset them to empty.
///
/// Null is accepted. Calling it again on the same, reset value is a no-op.
///
/// # Safety
/// `mesh_data` must be null or point to a `MeshData` returned by one of the
/// load functions (possibly already released by this function).
#[no_mangle]
pub unsafe extern "C" fn free_mesh_data(mesh_data: *mut MeshData) {
    if mesh_data.is_null() {
        return;
    }
    (*mesh_data).release();
}
