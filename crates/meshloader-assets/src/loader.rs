//! Load entry points: import, validate, traverse, flatten

use std::path::Path;

use glam::Mat4;
use tracing::{error, info};

use crate::config::{AttributeLayout, LoaderConfig};
use crate::error::LoadError;
use crate::extract::{Accumulator, FlatMesh};
use crate::importer::ImporterRegistry;
use crate::scene::Scene;
use crate::traverse::process_node;

/// Load a model file with the default importers.
pub fn load_mesh(path: &Path, config: &LoaderConfig) -> Result<FlatMesh, LoadError> {
    load_mesh_with(&ImporterRegistry::default(), path, config)
}

/// Load a model file with a specific importer registry.
///
/// Import failures, incomplete scenes and scenes without a root are logged
/// at error level with the importer's message before being returned.
pub fn load_mesh_with(
    registry: &ImporterRegistry,
    path: &Path,
    config: &LoaderConfig,
) -> Result<FlatMesh, LoadError> {
    let result = registry
        .read_file(path, config.post_process)
        .map_err(LoadError::from)
        .and_then(|scene| flatten_scene(&scene, config.attribute_layout));

    match &result {
        Ok(mesh) => info!(
            "Loaded '{}': {} vertices, {} triangles",
            path.display(),
            mesh.vertices.len(),
            mesh.triangle_count()
        ),
        Err(e) => error!("Failed to load '{}': {}", path.display(), e),
    }
    result
}

/// Flatten an imported scene into global buffers.
pub fn flatten_scene(scene: &Scene, layout: AttributeLayout) -> Result<FlatMesh, LoadError> {
    if scene.is_incomplete() {
        return Err(LoadError::IncompleteScene);
    }
    let root = scene.root.as_ref().ok_or(LoadError::MissingRoot)?;

    let mut acc = Accumulator::new(layout);
    process_node(root, &Mat4::IDENTITY, scene, &mut acc);
    Ok(acc.finish())
}
