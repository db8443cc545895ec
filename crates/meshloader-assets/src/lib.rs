//! Meshloader Assets - Model import and scene flattening
//!
//! Imports glTF 2.0, Wavefront OBJ and STL files into a common scene graph,
//! applies the requested post-processing steps, then walks the graph and
//! flattens every mesh into shared vertex, attribute and index buffers.

mod config;
mod error;
mod extract;
mod gltf_loader;
mod importer;
mod loader;
mod obj_loader;
mod postprocess;
mod scene;
mod stl_loader;
mod traverse;

pub use config::{AttributeLayout, LoaderConfig, PostProcess};
pub use error::{ConfigError, ImportError, LoadError};
pub use extract::{process_mesh, Accumulator, FlatMesh};
pub use gltf_loader::GltfImporter;
pub use importer::{Importer, ImporterRegistry};
pub use loader::{flatten_scene, load_mesh, load_mesh_with};
pub use obj_loader::ObjImporter;
pub use scene::{
    Face, MaterialKey, MaterialValue, Mesh, Node, Scene, SceneFlags, SceneMaterial,
};
pub use stl_loader::StlImporter;
pub use traverse::process_node;
