use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::Vec3;
use tracing::debug;

use crate::error::ImportError;
use crate::importer::Importer;
use crate::scene::{Face, Mesh, Node, Scene};

/// STL importer (ASCII and binary).
///
/// Produces one mesh of triangles attached to the root node. STL stores one
/// normal per facet, not per vertex, so no normal channel is declared.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlImporter;

impl Importer for StlImporter {
    fn name(&self) -> &'static str {
        "STL"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["stl"]
    }

    fn read(&self, path: &Path) -> Result<Scene, ImportError> {
        let file = File::open(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
        let mut reader = BufReader::new(file);
        let stl = stl_io::read_stl(&mut reader)
            .map_err(|e| ImportError::Stl(path.to_path_buf(), e))?;

        let positions: Vec<Vec3> = stl
            .vertices
            .iter()
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect();
        let faces: Vec<Face> = stl
            .faces
            .iter()
            .map(|f| Face::new(f.vertices.iter().map(|&i| i as u32).collect::<Vec<_>>()))
            .collect();

        debug!(
            "STL '{}': {} vertices, {} triangles",
            path.display(),
            positions.len(),
            faces.len()
        );

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("stl")
            .to_string();
        let meshes = if faces.is_empty() {
            Vec::new()
        } else {
            vec![Mesh {
                name: name.clone(),
                positions,
                faces,
                ..Default::default()
            }]
        };
        let root = Node::new(name).with_meshes(0..meshes.len());

        Ok(Scene {
            root: Some(root),
            meshes,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA_STL: &str = "\
solid tetra
facet normal 0 0 -1
  outer loop
    vertex 0 0 0
    vertex 0 1 0
    vertex 1 0 0
  endloop
endfacet
facet normal 0 -1 0
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 0 1
  endloop
endfacet
endsolid tetra
";

    #[test]
    fn imports_ascii_stl_with_shared_vertices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tetra.stl");
        std::fs::write(&path, TETRA_STL).unwrap();

        let scene = StlImporter.read(&path).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        let mesh = &scene.meshes[0];
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.positions.len(), 4);
        assert!(mesh.normals.is_none());
        assert_eq!(scene.root.unwrap().meshes, vec![0]);
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.stl");
        std::fs::write(&path, "solid nope\nfacet banana\n").unwrap();
        assert!(StlImporter.read(&path).is_err());
    }
}
