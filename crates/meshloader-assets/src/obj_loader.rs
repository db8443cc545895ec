//! Wavefront OBJ importer
//!
//! Reads OBJ files through `tobj` with a single index stream, so positions,
//! normals and texture coordinates line up per vertex. Faces keep their
//! original arity; triangulation is left to post-processing. Materials come
//! from the referenced MTL files.

use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use tracing::{debug, warn};

use crate::error::ImportError;
use crate::importer::Importer;
use crate::scene::{Face, MaterialKey, Mesh, Node, Scene, SceneMaterial};

/// OBJ importer
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjImporter;

impl Importer for ObjImporter {
    fn name(&self) -> &'static str {
        "OBJ"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["obj"]
    }

    fn read(&self, path: &Path) -> Result<Scene, ImportError> {
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: false,
            ignore_points: false,
            ignore_lines: false,
            ..Default::default()
        };
        let (models, materials) = tobj::load_obj(path, &options)
            .map_err(|e| ImportError::Obj(path.to_path_buf(), e))?;

        let materials = match materials {
            Ok(materials) => materials.into_iter().map(convert_material).collect(),
            Err(e) => {
                warn!("Materials for '{}' unavailable: {}", path.display(), e);
                Vec::new()
            }
        };

        let mut root = Node::new(
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("root"),
        );
        let mut meshes = Vec::with_capacity(models.len());

        for model in models {
            let mesh = convert_mesh(&model.name, &model.mesh);
            debug!(
                "OBJ model '{}': {} vertices, {} faces",
                model.name,
                mesh.positions.len(),
                mesh.faces.len()
            );
            root.children
                .push(Node::new(model.name.clone()).with_meshes([meshes.len()]));
            meshes.push(mesh);
        }

        Ok(Scene {
            root: Some(root),
            meshes,
            materials,
            ..Default::default()
        })
    }
}

fn convert_mesh(name: &str, mesh: &tobj::Mesh) -> Mesh {
    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let count = positions.len();

    let normals = (mesh.normals.len() >= count * 3 && count > 0).then(|| {
        mesh.normals
            .chunks_exact(3)
            .take(count)
            .map(|n| Vec3::new(n[0], n[1], n[2]))
            .collect()
    });

    let tex_coords = (mesh.texcoords.len() >= count * 2 && count > 0).then(|| {
        mesh.texcoords
            .chunks_exact(2)
            .take(count)
            .map(|t| Vec2::new(t[0], t[1]))
            .collect()
    });

    let colors = (mesh.vertex_color.len() >= count * 3 && count > 0).then(|| {
        mesh.vertex_color
            .chunks_exact(3)
            .take(count)
            .map(|c| Vec4::new(c[0], c[1], c[2], 1.0))
            .collect()
    });

    Mesh {
        name: name.to_string(),
        positions,
        normals,
        tex_coords,
        colors,
        faces: split_faces(&mesh.indices, &mesh.face_arities),
        material: mesh.material_id,
    }
}

/// Split a flat index list by face arity. No arities means all triangles.
fn split_faces(indices: &[u32], arities: &[u32]) -> Vec<Face> {
    if arities.is_empty() {
        return indices
            .chunks_exact(3)
            .map(|tri| Face::triangle(tri[0], tri[1], tri[2]))
            .collect();
    }

    let mut faces = Vec::with_capacity(arities.len());
    let mut start = 0usize;
    for &arity in arities {
        let end = start + arity as usize;
        let Some(slice) = indices.get(start..end) else {
            warn!("OBJ face arity runs past the index list");
            break;
        };
        faces.push(Face::new(slice.to_vec()));
        start = end;
    }
    faces
}

fn convert_material(material: tobj::Material) -> SceneMaterial {
    let mut out = SceneMaterial::new(material.name);
    if let Some(ka) = material.ambient {
        out = out.with_color(MaterialKey::ColorAmbient, Vec3::from(ka));
    }
    if let Some(kd) = material.diffuse {
        out = out.with_color(MaterialKey::ColorDiffuse, Vec3::from(kd));
    }
    if let Some(ks) = material.specular {
        out = out.with_color(MaterialKey::ColorSpecular, Vec3::from(ks));
    }
    if let Some(ns) = material.shininess {
        out = out.with_float(MaterialKey::Shininess, ns);
    }
    out
}
