//! Post-processing steps applied after import

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::config::PostProcess;
use crate::scene::{Face, Mesh, Scene};

/// Apply the requested steps to every mesh in the scene.
pub fn apply(scene: &mut Scene, flags: PostProcess) {
    for mesh in &mut scene.meshes {
        if flags.contains(PostProcess::TRIANGULATE) {
            triangulate(mesh);
        }
        if flags.contains(PostProcess::GEN_SMOOTH_NORMALS) {
            generate_smooth_normals(mesh);
        }
        if flags.contains(PostProcess::FLIP_UVS) {
            flip_uvs(mesh);
        }
    }
}

/// Fan-split polygons with more than three indices. Points and lines are
/// left alone.
pub fn triangulate(mesh: &mut Mesh) {
    if mesh.faces.iter().all(|f| f.len() <= 3) {
        return;
    }
    let mut faces = Vec::with_capacity(mesh.faces.len());
    for face in mesh.faces.drain(..) {
        if face.len() <= 3 {
            faces.push(face);
            continue;
        }
        let first = face.indices[0];
        for pair in face.indices[1..].windows(2) {
            faces.push(Face::triangle(first, pair[0], pair[1]));
        }
    }
    debug!("Triangulated mesh '{}' into {} faces", mesh.name, faces.len());
    mesh.faces = faces;
}

/// Bit pattern of a position, with -0.0 folded into 0.0.
fn position_key(p: Vec3) -> [u32; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

/// Generate smooth normals for a mesh without them.
///
/// Each polygon contributes its area-weighted normal to every vertex at the
/// same position as one of its corners, so seams split only by UVs still
/// shade smoothly. Meshes with only points or lines are skipped.
pub fn generate_smooth_normals(mesh: &mut Mesh) {
    if mesh.normals.is_some() || !mesh.faces.iter().any(Face::is_polygon) {
        return;
    }
    let positions = &mesh.positions;
    let mut sums: HashMap<[u32; 3], Vec3> = HashMap::new();

    for face in mesh.faces.iter().filter(|f| f.is_polygon()) {
        let Some(corners) = face
            .indices
            .iter()
            .map(|&i| positions.get(i as usize).copied())
            .collect::<Option<Vec<Vec3>>>()
        else {
            continue;
        };
        let origin = corners[0];
        let normal = corners[1..]
            .windows(2)
            .map(|pair| (pair[0] - origin).cross(pair[1] - origin))
            .sum::<Vec3>();
        for corner in &corners {
            *sums.entry(position_key(*corner)).or_insert(Vec3::ZERO) += normal;
        }
    }

    let normals = positions
        .iter()
        .map(|p| {
            sums.get(&position_key(*p))
                .copied()
                .unwrap_or(Vec3::ZERO)
                .normalize_or_zero()
        })
        .collect();
    mesh.normals = Some(normals);
    debug!("Generated smooth normals for mesh '{}'", mesh.name);
}

/// Mirror the first UV channel vertically.
pub fn flip_uvs(mesh: &mut Mesh) {
    if let Some(tex_coords) = &mut mesh.tex_coords {
        for uv in tex_coords.iter_mut() {
            *uv = Vec2::new(uv.x, 1.0 - uv.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn triangulate_quad() {
        let mut mesh = quad();
        mesh.faces.push(Face::new(vec![0, 1]));
        triangulate(&mut mesh);
        assert_eq!(
            mesh.faces,
            vec![
                Face::triangle(0, 1, 2),
                Face::triangle(0, 2, 3),
                Face::new(vec![0, 1])
            ]
        );
    }

    #[test]
    fn smooth_normals_for_flat_quad() {
        let mut mesh = quad();
        generate_smooth_normals(&mut mesh);
        let normals = mesh.normals.unwrap();
        assert_eq!(normals.len(), 4);
        for n in normals {
            assert!((n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn smooth_normals_shared_across_split_vertices() {
        // Two triangles meeting at a right angle along the x axis, with the
        // shared edge duplicated as separate vertices.
        let mut mesh = Mesh {
            name: "hinge".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 0.0),
            ],
            faces: vec![Face::triangle(0, 1, 2), Face::triangle(3, 4, 5)],
            ..Default::default()
        };
        generate_smooth_normals(&mut mesh);
        let normals = mesh.normals.unwrap();
        let expected = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((normals[0] - expected).length() < 1e-6);
        assert!((normals[3] - expected).length() < 1e-6);
        assert!((normals[2] - Vec3::Z).length() < 1e-6);
        assert!((normals[4] - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn existing_normals_are_kept() {
        let mut mesh = quad();
        mesh.normals = Some(vec![Vec3::X; 4]);
        generate_smooth_normals(&mut mesh);
        assert_eq!(mesh.normals.unwrap(), vec![Vec3::X; 4]);
    }

    #[test]
    fn line_meshes_get_no_normals() {
        let mut mesh = quad();
        mesh.faces = vec![Face::new(vec![0, 1])];
        generate_smooth_normals(&mut mesh);
        assert!(mesh.normals.is_none());
    }

    #[test]
    fn flip_uvs_mirrors_v() {
        let mut mesh = quad();
        mesh.tex_coords = Some(vec![Vec2::new(0.25, 0.0), Vec2::new(0.5, 0.75)]);
        flip_uvs(&mut mesh);
        assert_eq!(
            mesh.tex_coords.unwrap(),
            vec![Vec2::new(0.25, 1.0), Vec2::new(0.5, 0.25)]
        );
    }

    #[test]
    fn apply_respects_flags() {
        let mut scene = Scene {
            meshes: vec![quad()],
            ..Default::default()
        };
        apply(&mut scene, PostProcess::empty());
        assert_eq!(scene.meshes[0].faces.len(), 1);
        assert!(scene.meshes[0].normals.is_none());

        apply(&mut scene, PostProcess::DEFAULT);
        assert_eq!(scene.meshes[0].faces.len(), 2);
        assert!(scene.meshes[0].normals.is_some());
    }
}
