use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{read_short3, write_short3, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

/// Decoded child reference of a render node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeChild {
  Node(usize),
  Leaf(usize),
}

impl NodeChild {
  /// Non-negative values are node indices, negative values are bitwise inverted leaf indices.
  pub fn from_raw(value: i16) -> Self {
    if value >= 0 {
      NodeChild::Node(value as usize)
    } else {
      NodeChild::Leaf(!(value as i32) as usize)
    }
  }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
  pub plane_index: u32,
  pub children: [i16; 2],
  pub mins: [i16; 3],
  pub maxs: [i16; 3],
  pub first_face: u16,
  pub faces_count: u16,
}

impl Node {
  /// Child 0 is in front of the plane, child 1 behind it.
  pub fn child(&self, side: usize) -> NodeChild {
    NodeChild::from_raw(self.children[side])
  }
}

impl LumpData for Node {
  fn lump_type() -> LumpType {
    LumpType::Nodes
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let plane_index = reader.read_u32()?;
    let children: [i16; 2] = [
      reader.read_i16()?,
      reader.read_i16()?
    ];
    let mins = read_short3(reader)?;
    let maxs = read_short3(reader)?;
    let first_face = reader.read_u16()?;
    let faces_count = reader.read_u16()?;

    Ok(Self {
      plane_index,
      children,
      mins,
      maxs,
      first_face,
      faces_count,
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u32(self.plane_index)?;
    writer.write_i16(self.children[0])?;
    writer.write_i16(self.children[1])?;
    write_short3(writer, self.mins)?;
    write_short3(writer, self.maxs)?;
    writer.write_u16(self.first_face)?;
    writer.write_u16(self.faces_count)
  }
}
