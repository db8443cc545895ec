//! Per-mesh extraction into the shared output buffers

use glam::Mat4;
use meshloader_core::{Material, Vec2f, Vec3f, Vec4f};
use tracing::{debug, warn};

use crate::config::AttributeLayout;
use crate::scene::{MaterialKey, Mesh, Scene};

/// Flattened result of a load: global vertex and attribute buffers, a
/// triangle index list and the last material seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMesh {
    pub vertices: Vec<Vec3f>,
    pub normals: Vec<Vec3f>,
    pub tex_coords: Vec<Vec2f>,
    pub colors: Vec<Vec4f>,
    pub indices: Vec<i32>,
    pub material: Material,
}

impl FlatMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounds of the vertex buffer, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3f, Vec3f)> {
        let first = self.vertices.first()?;
        let (mut min, mut max) = (*first, *first);
        for v in &self.vertices[1..] {
            min = Vec3f::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z));
            max = Vec3f::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z));
        }
        Some((min, max))
    }
}

/// Mutable accumulator threaded through the traversal.
#[derive(Debug, Default)]
pub struct Accumulator {
    layout: AttributeLayout,
    out: FlatMesh,
}

impl Accumulator {
    pub fn new(layout: AttributeLayout) -> Self {
        Self {
            layout,
            out: FlatMesh::default(),
        }
    }

    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    /// Buffers accumulated so far.
    pub fn buffers(&self) -> &FlatMesh {
        &self.out
    }

    /// Finish the load. With the padded layout every non-empty attribute
    /// buffer is extended to the vertex count.
    pub fn finish(mut self) -> FlatMesh {
        if self.layout == AttributeLayout::Padded {
            let count = self.out.vertices.len();
            pad_to(&mut self.out.normals, count, Vec3f::ZERO);
            pad_to(&mut self.out.tex_coords, count, Vec2f::ZERO);
            pad_to(&mut self.out.colors, count, Vec4f::WHITE);
        }
        self.out
    }
}

fn pad_to<T: Copy>(buffer: &mut Vec<T>, len: usize, fill: T) {
    if !buffer.is_empty() && buffer.len() < len {
        buffer.resize(len, fill);
    }
}

/// Append an attribute channel for the mesh whose first vertex sits at `base`.
fn append_channel<T: Copy>(
    buffer: &mut Vec<T>,
    layout: AttributeLayout,
    base: usize,
    fill: T,
    values: impl IntoIterator<Item = T>,
) {
    if layout == AttributeLayout::Padded && buffer.len() < base {
        buffer.resize(base, fill);
    }
    buffer.extend(values);
}

/// Extract one mesh into the accumulator.
///
/// Positions are transformed by `transform`; normals by its linear part and
/// renormalized. Texture coordinates and colors are copied as-is. Faces are
/// fan-triangulated and their indices offset by the vertex count before this
/// mesh. Faces with fewer than three indices, or with an index outside the
/// mesh, are skipped. Material properties the mesh's material declares
/// overwrite the accumulated material; absent ones keep their old value.
pub fn process_mesh(mesh: &Mesh, transform: &Mat4, scene: &Scene, acc: &mut Accumulator) {
    let layout = acc.layout;
    let out = &mut acc.out;
    let base = out.vertices.len();
    let vertex_count = mesh.vertex_count();

    out.vertices.extend(
        mesh.positions
            .iter()
            .map(|p| Vec3f::from(transform.transform_point3(*p))),
    );

    if let Some(normals) = &mesh.normals {
        append_channel(
            &mut out.normals,
            layout,
            base,
            Vec3f::ZERO,
            normals
                .iter()
                .take(vertex_count)
                .map(|n| Vec3f::from(transform.transform_vector3(*n).normalize_or_zero())),
        );
    }

    if let Some(tex_coords) = &mesh.tex_coords {
        append_channel(
            &mut out.tex_coords,
            layout,
            base,
            Vec2f::ZERO,
            tex_coords.iter().take(vertex_count).map(|uv| Vec2f::from(*uv)),
        );
    }

    if let Some(colors) = &mesh.colors {
        append_channel(
            &mut out.colors,
            layout,
            base,
            Vec4f::WHITE,
            colors.iter().take(vertex_count).map(|c| Vec4f::from(*c)),
        );
    }

    let mut skipped = 0usize;
    for face in &mesh.faces {
        if !face.is_polygon() {
            skipped += 1;
            continue;
        }
        if face.indices.iter().any(|&i| i as usize >= vertex_count) {
            warn!(
                "Mesh '{}': face references a vertex outside the mesh, skipping",
                mesh.name
            );
            skipped += 1;
            continue;
        }
        let bias = |i: u32| (base + i as usize) as i32;
        let first = bias(face.indices[0]);
        for pair in face.indices[1..].windows(2) {
            out.indices.push(first);
            out.indices.push(bias(pair[0]));
            out.indices.push(bias(pair[1]));
        }
    }

    if let Some(index) = mesh.material {
        match scene.materials.get(index) {
            Some(source) => {
                let material = &mut out.material;
                if let Some(c) = source.color(MaterialKey::ColorAmbient) {
                    material.ambient = c.into();
                }
                if let Some(c) = source.color(MaterialKey::ColorDiffuse) {
                    material.diffuse = c.into();
                }
                if let Some(c) = source.color(MaterialKey::ColorSpecular) {
                    material.specular = c.into();
                }
                if let Some(s) = source.float(MaterialKey::Shininess) {
                    material.shininess = s;
                }
            }
            None => warn!("Mesh '{}': material index {} out of range", mesh.name, index),
        }
    }

    debug!(
        "Mesh '{}': {} vertices, {} faces ({} skipped)",
        mesh.name,
        vertex_count,
        mesh.faces.len(),
        skipped
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Face, SceneMaterial};
    use glam::{Vec2, Vec3, Vec4};

    fn quad() -> Mesh {
        Mesh {
            name: "quad".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![Face::new(vec![0, 1, 2, 3])],
            ..Default::default()
        }
    }

    fn extract(meshes: &[Mesh], layout: AttributeLayout) -> FlatMesh {
        let scene = Scene::default();
        let mut acc = Accumulator::new(layout);
        for mesh in meshes {
            process_mesh(mesh, &Mat4::IDENTITY, &scene, &mut acc);
        }
        acc.finish()
    }

    #[test]
    fn quad_fans_into_two_triangles() {
        let out = extract(&[quad()], AttributeLayout::Ragged);
        assert_eq!(out.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(out.triangle_count(), 2);
    }

    #[test]
    fn pentagon_fans_from_first_index() {
        let mut mesh = quad();
        mesh.positions.push(Vec3::new(0.5, 1.5, 0.0));
        mesh.faces = vec![Face::new(vec![4, 0, 1, 2, 3])];
        let out = extract(&[mesh], AttributeLayout::Ragged);
        assert_eq!(out.indices, vec![4, 0, 1, 4, 1, 2, 4, 2, 3]);
    }

    #[test]
    fn points_and_lines_are_skipped() {
        let mut mesh = quad();
        mesh.faces = vec![
            Face::new(vec![0]),
            Face::new(vec![0, 1]),
            Face::new(Vec::new()),
            Face::triangle(0, 1, 2),
        ];
        let out = extract(&[mesh], AttributeLayout::Ragged);
        assert_eq!(out.indices, vec![0, 1, 2]);
    }

    #[test]
    fn out_of_range_face_is_skipped() {
        let mut mesh = quad();
        mesh.faces = vec![Face::triangle(0, 1, 9), Face::triangle(1, 2, 3)];
        let out = extract(&[mesh], AttributeLayout::Ragged);
        assert_eq!(out.indices, vec![1, 2, 3]);
    }

    #[test]
    fn second_mesh_indices_are_biased() {
        let mut tri = quad();
        tri.faces = vec![Face::triangle(0, 1, 2)];
        let out = extract(&[quad(), tri], AttributeLayout::Ragged);
        assert_eq!(out.vertices.len(), 8);
        assert_eq!(&out.indices[6..], &[4, 5, 6]);
        assert!(out.indices.iter().all(|&i| (0..8).contains(&i)));
    }

    #[test]
    fn positions_include_translation() {
        let scene = Scene::default();
        let mut acc = Accumulator::new(AttributeLayout::Ragged);
        let transform = Mat4::from_translation(Vec3::new(10.0, 0.0, -2.0));
        process_mesh(&quad(), &transform, &scene, &mut acc);
        let out = acc.finish();
        assert_eq!(out.vertices[2], Vec3f::new(11.0, 1.0, -2.0));
    }

    #[test]
    fn normals_are_renormalized_under_scale() {
        let scene = Scene::default();
        let mut mesh = quad();
        mesh.normals = Some(vec![
            Vec3::Z,
            Vec3::new(1.0, 1.0, 0.0).normalize(),
            Vec3::Y,
            Vec3::X,
        ]);
        let mut acc = Accumulator::new(AttributeLayout::Ragged);
        let transform =
            Mat4::from_scale(Vec3::new(4.0, 0.5, 2.0)) * Mat4::from_translation(Vec3::splat(3.0));
        process_mesh(&mesh, &transform, &scene, &mut acc);
        let out = acc.finish();
        assert_eq!(out.normals.len(), 4);
        for n in &out.normals {
            assert!((n.length() - 1.0).abs() < 1e-5, "normal {:?} not unit", n);
        }
        assert_eq!(out.normals[0], Vec3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn tex_coords_and_colors_copied_raw() {
        let scene = Scene::default();
        let mut mesh = quad();
        mesh.tex_coords = Some(vec![Vec2::new(0.0, 1.0); 4]);
        mesh.colors = Some(vec![Vec4::new(0.1, 0.2, 0.3, 0.4); 4]);
        let mut acc = Accumulator::new(AttributeLayout::Ragged);
        process_mesh(&mesh, &Mat4::from_scale(Vec3::splat(5.0)), &scene, &mut acc);
        let out = acc.finish();
        assert_eq!(out.tex_coords, vec![Vec2f::new(0.0, 1.0); 4]);
        assert_eq!(out.colors, vec![Vec4f::new(0.1, 0.2, 0.3, 0.4); 4]);
    }

    #[test]
    fn ragged_layout_keeps_attribute_gaps() {
        let mut with_normals = quad();
        with_normals.normals = Some(vec![Vec3::Z; 4]);
        let out = extract(&[quad(), with_normals], AttributeLayout::Ragged);
        assert_eq!(out.vertices.len(), 8);
        assert_eq!(out.normals.len(), 4);
        assert!(out.colors.is_empty());
    }

    #[test]
    fn padded_layout_aligns_attributes() {
        let mut with_normals = quad();
        with_normals.normals = Some(vec![Vec3::Z; 4]);
        let mut with_uvs = quad();
        with_uvs.tex_coords = Some(vec![Vec2::ONE; 4]);

        let out = extract(&[quad(), with_normals, with_uvs, quad()], AttributeLayout::Padded);
        assert_eq!(out.vertices.len(), 16);
        assert_eq!(out.normals.len(), 16);
        assert_eq!(out.tex_coords.len(), 16);
        assert!(out.colors.is_empty(), "undeclared attribute stays empty");

        assert_eq!(out.normals[0], Vec3f::ZERO);
        assert_eq!(out.normals[4], Vec3f::new(0.0, 0.0, 1.0));
        assert_eq!(out.normals[8], Vec3f::ZERO);
        assert_eq!(out.tex_coords[7], Vec2f::ZERO);
        assert_eq!(out.tex_coords[8], Vec2f::new(1.0, 1.0));
        assert_eq!(out.tex_coords[12], Vec2f::ZERO);
    }

    #[test]
    fn partial_material_keeps_previous_fields() {
        let scene = Scene {
            materials: vec![
                SceneMaterial::new("full")
                    .with_color(MaterialKey::ColorAmbient, Vec3::splat(0.1))
                    .with_color(MaterialKey::ColorDiffuse, Vec3::splat(0.2))
                    .with_color(MaterialKey::ColorSpecular, Vec3::splat(0.3))
                    .with_float(MaterialKey::Shininess, 8.0),
                SceneMaterial::new("diffuse_only")
                    .with_color(MaterialKey::ColorDiffuse, Vec3::new(1.0, 0.0, 0.0)),
            ],
            ..Default::default()
        };
        let mut first = quad();
        first.material = Some(0);
        let mut second = quad();
        second.material = Some(1);

        let mut acc = Accumulator::new(AttributeLayout::Padded);
        process_mesh(&first, &Mat4::IDENTITY, &scene, &mut acc);
        process_mesh(&second, &Mat4::IDENTITY, &scene, &mut acc);
        let material = acc.finish().material;

        assert_eq!(material.diffuse, Vec3f::new(1.0, 0.0, 0.0));
        assert_eq!(material.ambient, Vec3f::new(0.1, 0.1, 0.1));
        assert_eq!(material.specular, Vec3f::new(0.3, 0.3, 0.3));
        assert_eq!(material.shininess, 8.0);
    }

    #[test]
    fn diffuse_only_material_leaves_rest_zero() {
        let scene = Scene {
            materials: vec![SceneMaterial::new("d")
                .with_color(MaterialKey::ColorDiffuse, Vec3::new(0.2, 0.4, 0.6))],
            ..Default::default()
        };
        let mut mesh = quad();
        mesh.material = Some(0);
        let mut acc = Accumulator::new(AttributeLayout::Padded);
        process_mesh(&mesh, &Mat4::IDENTITY, &scene, &mut acc);
        let material = acc.finish().material;
        assert_eq!(material.diffuse, Vec3f::new(0.2, 0.4, 0.6));
        assert_eq!(material.ambient, Vec3f::ZERO);
        assert_eq!(material.specular, Vec3f::ZERO);
        assert_eq!(material.shininess, 0.0);
    }

    #[test]
    fn missing_material_index_is_ignored() {
        let mut mesh = quad();
        mesh.material = Some(3);
        let out = extract(&[mesh], AttributeLayout::Padded);
        assert!(out.material.is_unset());
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let out = extract(&[quad()], AttributeLayout::Padded);
        let (min, max) = out.bounds().unwrap();
        assert_eq!(min, Vec3f::ZERO);
        assert_eq!(max, Vec3f::new(1.0, 1.0, 0.0));
        assert!(FlatMesh::default().bounds().is_none());
    }
}
