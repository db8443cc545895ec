use std::path::Path;

use glam::{Mat4, Vec2, Vec3, Vec4};
use gltf::mesh::Mode;
use tracing::debug;

use crate::error::ImportError;
use crate::importer::Importer;
use crate::scene::{Face, MaterialKey, Mesh, Node, Scene, SceneMaterial};

/// Shininess reported for a glossiness factor of 1.0.
const GLOSSINESS_TO_SHININESS: f32 = 1000.0;

/// glTF 2.0 importer (.gltf and .glb).
///
/// Every primitive becomes its own scene mesh, so a glTF mesh maps to a list
/// of scene meshes. The scene's root nodes hang off a synthetic identity
/// root. Texture coordinates are converted to a bottom-left origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfImporter;

impl Importer for GltfImporter {
    fn name(&self) -> &'static str {
        "glTF"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["gltf", "glb"]
    }

    fn read(&self, path: &Path) -> Result<Scene, ImportError> {
        let (document, buffers, _images) =
            gltf::import(path).map_err(|e| ImportError::Gltf(path.to_path_buf(), e))?;

        let materials = document.materials().map(convert_material).collect();

        // glTF mesh index -> scene mesh indices (one per primitive).
        let mut meshes = Vec::new();
        let mut primitive_meshes: Vec<Vec<usize>> = Vec::new();

        for mesh in document.meshes() {
            let name = mesh.name().unwrap_or("unnamed").to_string();
            let mut indices = Vec::new();

            for primitive in mesh.primitives() {
                let reader =
                    primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

                let Some(positions) = reader.read_positions() else {
                    debug!("Skipping primitive without positions in mesh '{}'", name);
                    continue;
                };
                let positions: Vec<Vec3> = positions.map(Vec3::from).collect();

                let normals: Option<Vec<Vec3>> =
                    reader.read_normals().map(|iter| iter.map(Vec3::from).collect());

                let tex_coords: Option<Vec<Vec2>> = reader.read_tex_coords(0).map(|tc| {
                    tc.into_f32()
                        .map(|[u, v]| Vec2::new(u, 1.0 - v))
                        .collect()
                });

                let colors: Option<Vec<Vec4>> = reader
                    .read_colors(0)
                    .map(|c| c.into_rgba_f32().map(Vec4::from).collect());

                let vertex_indices: Vec<u32> = match reader.read_indices() {
                    Some(idx) => idx.into_u32().collect(),
                    None => (0..positions.len() as u32).collect(),
                };

                indices.push(meshes.len());
                meshes.push(Mesh {
                    name: name.clone(),
                    faces: faces_for_mode(primitive.mode(), &vertex_indices),
                    positions,
                    normals,
                    tex_coords,
                    colors,
                    material: primitive.material().index(),
                });
            }

            debug!("Loaded mesh '{}' with {} primitives", name, indices.len());
            primitive_meshes.push(indices);
        }

        let root = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .map(|scene| {
                let mut root = Node::new(scene.name().unwrap_or("root"));
                root.children = scene
                    .nodes()
                    .map(|node| convert_node(&node, &primitive_meshes))
                    .collect();
                root
            });

        debug!(
            "glTF '{}': {} meshes, {} primitives",
            path.display(),
            primitive_meshes.len(),
            meshes.len()
        );

        Ok(Scene {
            root,
            meshes,
            materials,
            ..Default::default()
        })
    }
}

fn convert_node(node: &gltf::Node, primitive_meshes: &[Vec<usize>]) -> Node {
    let meshes = node
        .mesh()
        .and_then(|mesh| primitive_meshes.get(mesh.index()))
        .cloned()
        .unwrap_or_default();

    Node {
        name: node.name().unwrap_or("node").to_string(),
        transform: Mat4::from_cols_array_2d(&node.transform().matrix()),
        meshes,
        children: node
            .children()
            .map(|child| convert_node(&child, primitive_meshes))
            .collect(),
    }
}

fn convert_material(material: gltf::Material) -> SceneMaterial {
    let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
    let mut out = SceneMaterial::new(material.name().unwrap_or("material"))
        .with_color(MaterialKey::ColorDiffuse, Vec3::new(r, g, b));

    if let Some(specular) = material.specular() {
        out = out.with_color(
            MaterialKey::ColorSpecular,
            Vec3::from(specular.specular_color_factor()),
        );
    }

    if let Some(sg) = material.pbr_specular_glossiness() {
        let [r, g, b, _] = sg.diffuse_factor();
        out = out
            .with_color(MaterialKey::ColorDiffuse, Vec3::new(r, g, b))
            .with_color(MaterialKey::ColorSpecular, Vec3::from(sg.specular_factor()))
            .with_float(
                MaterialKey::Shininess,
                sg.glossiness_factor() * GLOSSINESS_TO_SHININESS,
            );
    }

    out
}

/// Turn a primitive's index stream into faces according to its draw mode.
fn faces_for_mode(mode: Mode, indices: &[u32]) -> Vec<Face> {
    match mode {
        Mode::Points => indices.iter().map(|&i| Face::new(vec![i])).collect(),
        Mode::Lines => indices
            .chunks_exact(2)
            .map(|pair| Face::new(pair.to_vec()))
            .collect(),
        Mode::LineStrip => indices
            .windows(2)
            .map(|pair| Face::new(pair.to_vec()))
            .collect(),
        Mode::LineLoop => {
            let mut faces: Vec<Face> = indices
                .windows(2)
                .map(|pair| Face::new(pair.to_vec()))
                .collect();
            if let (Some(&first), Some(&last)) = (indices.first(), indices.last()) {
                if indices.len() > 2 {
                    faces.push(Face::new(vec![last, first]));
                }
            }
            faces
        }
        Mode::Triangles => indices
            .chunks_exact(3)
            .map(|tri| Face::triangle(tri[0], tri[1], tri[2]))
            .collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, tri)| {
                if i % 2 == 0 {
                    Face::triangle(tri[0], tri[1], tri[2])
                } else {
                    Face::triangle(tri[1], tri[0], tri[2])
                }
            })
            .collect(),
        Mode::TriangleFan => match indices.split_first() {
            Some((&first, rest)) => rest
                .windows(2)
                .map(|pair| Face::triangle(first, pair[0], pair[1]))
                .collect(),
            None => Vec::new(),
        },
    }
}
