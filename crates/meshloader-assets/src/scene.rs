//! In-memory scene graph produced by every importer

use std::collections::HashMap;

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3, Vec4};

bitflags! {
    /// State flags attached to an imported scene.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SceneFlags: u32 {
        /// The importer could not produce usable geometry.
        const INCOMPLETE = 0x1;
    }
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A fully imported model: node hierarchy plus mesh and material tables.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub root: Option<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<SceneMaterial>,
    pub flags: SceneFlags,
}

impl Scene {
    /// Whether the scene was flagged incomplete by the importer.
    pub fn is_incomplete(&self) -> bool {
        self.flags.contains(SceneFlags::INCOMPLETE)
    }

    /// Total number of nodes in the hierarchy.
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.root.as_ref().map_or(0, count)
    }
}

/// A node in the scene hierarchy.
///
/// `transform` is relative to the parent node. `meshes` index into
/// [`Scene::meshes`].
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Mat4,
    pub meshes: Vec<usize>,
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty node with an identity transform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = usize>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

/// A polygon as a list of vertex indices local to its mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<u32>,
}

impl Face {
    pub fn new(indices: impl Into<Vec<u32>>) -> Self {
        Self {
            indices: indices.into(),
        }
    }

    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self::new(vec![a, b, c])
    }

    /// Number of indices in this face.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Faces with fewer than three indices are points or lines.
    pub fn is_polygon(&self) -> bool {
        self.indices.len() >= 3
    }
}

/// A single mesh with optional per-vertex attribute channels.
///
/// When present, `normals`, `tex_coords` and `colors` have exactly one entry
/// per position.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub colors: Option<Vec<Vec4>>,
    pub faces: Vec<Face>,
    pub material: Option<usize>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Well-known material property keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKey {
    ColorAmbient,
    ColorDiffuse,
    ColorSpecular,
    Shininess,
}

/// A stored material property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialValue {
    Color(Vec3),
    Float(f32),
}

/// A material as declared by the source file. Only the properties the file
/// actually declares are present.
#[derive(Debug, Clone, Default)]
pub struct SceneMaterial {
    pub name: String,
    properties: HashMap<MaterialKey, MaterialValue>,
}

impl SceneMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: MaterialKey, value: MaterialValue) {
        self.properties.insert(key, value);
    }

    pub fn with_color(mut self, key: MaterialKey, color: Vec3) -> Self {
        self.set(key, MaterialValue::Color(color));
        self
    }

    pub fn with_float(mut self, key: MaterialKey, value: f32) -> Self {
        self.set(key, MaterialValue::Float(value));
        self
    }

    /// Look up a color property. `None` if absent or not a color.
    pub fn color(&self, key: MaterialKey) -> Option<Vec3> {
        match self.properties.get(&key) {
            Some(MaterialValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    /// Look up a scalar property. `None` if absent or not a scalar.
    pub fn float(&self, key: MaterialKey) -> Option<f32> {
        match self.properties.get(&key) {
            Some(MaterialValue::Float(v)) => Some(*v),
            _ => None,
        }
    }
}
