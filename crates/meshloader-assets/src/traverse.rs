//! Depth-first scene traversal

use glam::Mat4;
use tracing::{trace, warn};

use crate::extract::{process_mesh, Accumulator};
use crate::scene::{Node, Scene};

/// Visit `node` and its descendants in pre-order.
///
/// The node's world transform is `parent * node.transform`. Every mesh
/// attached to the node is extracted with that transform before the
/// children are visited with it as their parent transform.
pub fn process_node(node: &Node, parent: &Mat4, scene: &Scene, acc: &mut Accumulator) {
    let transform = *parent * node.transform;
    trace!("Node '{}': {} meshes", node.name, node.meshes.len());

    for &index in &node.meshes {
        match scene.meshes.get(index) {
            Some(mesh) => process_mesh(mesh, &transform, scene, acc),
            None => warn!("Node '{}' references missing mesh {}", node.name, index),
        }
    }

    for child in &node.children {
        process_node(child, &transform, scene, acc);
    }
}
