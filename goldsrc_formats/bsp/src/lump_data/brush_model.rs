use std::io::{Read, Result as IOResult, Write};

use bevy_math::Vec3;

use crate::lump_data::{read_vec3, write_vec3, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

pub const MAX_MAP_HULLS: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BrushModel {
  pub min: Vec3,
  pub max: Vec3,
  pub origin: Vec3,
  /// Index 0 is the root of the render tree, the others are the clip hull roots.
  pub head_nodes: [i32; MAX_MAP_HULLS],
  pub visible_leaves: i32,
  pub first_face: u32,
  pub faces_count: u32
}

impl BrushModel {
  pub fn face_range(&self) -> std::ops::Range<usize> {
    let first = self.first_face as usize;
    first..first + self.faces_count as usize
  }
}

impl LumpData for BrushModel {
  fn lump_type() -> LumpType {
    LumpType::Models
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let min = read_vec3(reader)?;
    let max = read_vec3(reader)?;
    let origin = read_vec3(reader)?;
    let mut head_nodes = [0i32; MAX_MAP_HULLS];
    for head_node in &mut head_nodes {
      *head_node = reader.read_i32()?;
    }
    let visible_leaves = reader.read_i32()?;
    let first_face = reader.read_u32()?;
    let faces_count = reader.read_u32()?;
    Ok(Self {
      min,
      max,
      origin,
      head_nodes,
      visible_leaves,
      first_face,
      faces_count
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    write_vec3(writer, self.min)?;
    write_vec3(writer, self.max)?;
    write_vec3(writer, self.origin)?;
    for head_node in self.head_nodes {
      writer.write_i32(head_node)?;
    }
    writer.write_i32(self.visible_leaves)?;
    writer.write_u32(self.first_face)?;
    writer.write_u32(self.faces_count)
  }
}
