use std::path::Path;

use tracing::{debug, info};

use crate::config::PostProcess;
use crate::error::ImportError;
use crate::gltf_loader::GltfImporter;
use crate::obj_loader::ObjImporter;
use crate::postprocess;
use crate::scene::{Scene, SceneFlags};
use crate::stl_loader::StlImporter;

/// A file format reader producing a [`Scene`].
pub trait Importer {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Lower-case file extensions this importer accepts, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Read the file into a scene, without post-processing.
    fn read(&self, path: &Path) -> Result<Scene, ImportError>;
}

/// Dispatches files to importers by extension and runs post-processing.
pub struct ImporterRegistry {
    importers: Vec<Box<dyn Importer>>,
}

impl Default for ImporterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(GltfImporter);
        registry.register(ObjImporter);
        registry.register(StlImporter);
        registry
    }
}

impl ImporterRegistry {
    /// A registry with no importers.
    pub fn empty() -> Self {
        Self {
            importers: Vec::new(),
        }
    }

    /// Add an importer. Later registrations win for shared extensions.
    pub fn register(&mut self, importer: impl Importer + 'static) {
        self.importers.push(Box::new(importer));
    }

    /// Find the importer for a path's extension.
    pub fn find(&self, path: &Path) -> Option<&dyn Importer> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.importers
            .iter()
            .rev()
            .find(|importer| importer.extensions().contains(&ext.as_str()))
            .map(|importer| importer.as_ref())
    }

    /// Whether some importer accepts this path.
    pub fn can_read(&self, path: &Path) -> bool {
        self.find(path).is_some()
    }

    /// Import a file and apply the requested post-processing.
    ///
    /// A scene without any mesh is flagged [`SceneFlags::INCOMPLETE`].
    pub fn read_file(&self, path: &Path, flags: PostProcess) -> Result<Scene, ImportError> {
        if !path.exists() {
            return Err(ImportError::NotFound(path.to_path_buf()));
        }
        let importer = self
            .find(path)
            .ok_or_else(|| ImportError::UnsupportedFormat(path.to_path_buf()))?;

        debug!("Importing '{}' with {} importer", path.display(), importer.name());
        let mut scene = importer.read(path)?;

        if scene.meshes.is_empty() {
            scene.flags |= SceneFlags::INCOMPLETE;
        }
        postprocess::apply(&mut scene, flags);

        info!(
            "Imported '{}': {} nodes, {} meshes, {} materials",
            path.display(),
            scene.node_count(),
            scene.meshes.len(),
            scene.materials.len()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;
    use std::path::PathBuf;

    struct EmptyImporter;

    impl Importer for EmptyImporter {
        fn name(&self) -> &'static str {
            "empty"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["obj", "nothing"]
        }

        fn read(&self, _path: &Path) -> Result<Scene, ImportError> {
            Ok(Scene {
                root: Some(Node::new("root")),
                ..Default::default()
            })
        }
    }

    #[test]
    fn finds_importer_by_extension() {
        let registry = ImporterRegistry::default();
        assert_eq!(registry.find(Path::new("a/model.GLB")).unwrap().name(), "glTF");
        assert_eq!(registry.find(Path::new("model.obj")).unwrap().name(), "OBJ");
        assert_eq!(registry.find(Path::new("model.stl")).unwrap().name(), "STL");
        assert!(!registry.can_read(Path::new("model.fbx")));
        assert!(!registry.can_read(Path::new("no_extension")));
    }

    #[test]
    fn later_registration_wins() {
        let mut registry = ImporterRegistry::default();
        registry.register(EmptyImporter);
        assert_eq!(registry.find(Path::new("x.obj")).unwrap().name(), "empty");
        assert_eq!(registry.find(Path::new("x.gltf")).unwrap().name(), "glTF");
    }

    #[test]
    fn missing_file_is_not_found() {
        let registry = ImporterRegistry::default();
        let result = registry.read_file(Path::new("/nonexistent/model.obj"), PostProcess::DEFAULT);
        match result {
            Err(ImportError::NotFound(path)) => {
                assert_eq!(path, PathBuf::from("/nonexistent/model.obj"))
            }
            other => panic!("expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.fbx");
        std::fs::write(&path, b"binary").unwrap();
        let result = ImporterRegistry::default().read_file(&path, PostProcess::DEFAULT);
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn meshless_scene_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.nothing");
        std::fs::write(&path, b"").unwrap();

        let mut registry = ImporterRegistry::empty();
        registry.register(EmptyImporter);
        let scene = registry.read_file(&path, PostProcess::DEFAULT).unwrap();
        assert!(scene.is_incomplete());
    }
}
