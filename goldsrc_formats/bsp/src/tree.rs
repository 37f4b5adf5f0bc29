use bevy_math::Vec3;

use crate::error::CorruptionError;
use crate::lump::LumpType;
use crate::lump_data::{Leaf, Node, NodeChild, Plane};
use crate::map::BspFile;

/// Decoded node, plane and leaf arrays for point queries.
pub struct BspTree {
  nodes: Vec<Node>,
  planes: Vec<Plane>,
  leaves: Vec<Leaf>,
}

impl BspTree {
  pub fn new(nodes: Vec<Node>, planes: Vec<Plane>, leaves: Vec<Leaf>) -> Self {
    Self { nodes, planes, leaves }
  }

  pub fn from_file(map: &BspFile) -> Result<Self, CorruptionError> {
    Ok(Self::new(map.nodes()?, map.planes()?, map.leaves()?))
  }

  pub fn leaf(&self, index: usize) -> Option<&Leaf> {
    self.leaves.get(index)
  }

  /// Walks from `head_node` to the leaf containing `point`.
  /// Points exactly on a plane go to the front child.
  pub fn leaf_at(&self, head_node: usize, point: Vec3) -> Result<usize, CorruptionError> {
    let mut child = NodeChild::Node(head_node);
    // A well formed tree visits every node at most once on the way down.
    for _ in 0..=self.nodes.len() {
      let index = match child {
        NodeChild::Leaf(leaf) => {
          if leaf >= self.leaves.len() {
            return Err(CorruptionError::IndexOutOfRange {
              lump: LumpType::Leaves,
              index: leaf as i64,
              count: self.leaves.len(),
            });
          }
          return Ok(leaf);
        }
        NodeChild::Node(index) => index,
      };

      let node = self.nodes.get(index).ok_or(CorruptionError::IndexOutOfRange {
        lump: LumpType::Nodes,
        index: index as i64,
        count: self.nodes.len(),
      })?;
      let plane = self.planes.get(node.plane_index as usize).ok_or(CorruptionError::IndexOutOfRange {
        lump: LumpType::Planes,
        index: node.plane_index as i64,
        count: self.planes.len(),
      })?;
      let side = if plane.distance_to(point) >= 0f32 { 0 } else { 1 };
      child = node.child(side);
    }
    Err(CorruptionError::CyclicTree { node: head_node })
  }
}

impl BspFile {
  /// Decodes the tree for a single lookup. Use `BspTree` for repeated queries.
  pub fn leaf_at(&self, head_node: usize, point: Vec3) -> Result<usize, CorruptionError> {
    BspTree::from_file(self)?.leaf_at(head_node, point)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lump_data::{Contents, PlaneType};

  fn leaf(contents: Contents) -> Leaf {
    Leaf {
      contents,
      visibility_offset: None,
      mins: [0; 3],
      maxs: [0; 3],
      first_mark_surface: 0,
      mark_surfaces_count: 0,
      ambient_levels: [0; 4],
    }
  }

  fn split_tree(children: [i16; 2]) -> BspTree {
    BspTree::new(
      vec![Node { plane_index: 0, children, ..Default::default() }],
      vec![Plane { normal: Vec3::X, dist: 16.0, plane_type: PlaneType::X }],
      vec![leaf(Contents::Solid), leaf(Contents::Empty), leaf(Contents::Water)],
    )
  }

  #[test]
  fn point_lands_on_the_correct_side() {
    let tree = split_tree([!1, !2]);
    assert_eq!(tree.leaf_at(0, Vec3::new(32.0, 0.0, 0.0)), Ok(1));
    assert_eq!(tree.leaf_at(0, Vec3::new(0.0, 0.0, 0.0)), Ok(2));
    assert_eq!(tree.leaf_at(0, Vec3::new(16.0, 0.0, 0.0)), Ok(1));
    assert_eq!(tree.leaf(2).map(|leaf| leaf.contents), Some(Contents::Water));
  }

  #[test]
  fn self_referencing_node_is_reported() {
    let tree = split_tree([0, !1]);
    assert_eq!(tree.leaf_at(0, Vec3::new(32.0, 0.0, 0.0)), Err(CorruptionError::CyclicTree { node: 0 }));
  }

  #[test]
  fn leaf_out_of_range_is_reported() {
    let tree = split_tree([!7, !1]);
    assert_eq!(
      tree.leaf_at(0, Vec3::new(32.0, 0.0, 0.0)),
      Err(CorruptionError::IndexOutOfRange { lump: LumpType::Leaves, index: 7, count: 3 })
    );
  }
}
