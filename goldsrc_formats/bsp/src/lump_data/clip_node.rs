use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{Contents, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

/// Collision hulls end in content values instead of leaves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipNodeChild {
  Node(usize),
  Contents(Contents),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipNode {
  pub plane_index: i32,
  pub children: [i16; 2],
}

impl ClipNode {
  pub fn child(&self, side: usize) -> ClipNodeChild {
    let value = self.children[side];
    if value >= 0 {
      ClipNodeChild::Node(value as usize)
    } else {
      ClipNodeChild::Contents(Contents::from_raw(value as i32))
    }
  }
}

impl LumpData for ClipNode {
  fn lump_type() -> LumpType {
    LumpType::ClipNodes
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let plane_index = reader.read_i32()?;
    let children = [reader.read_i16()?, reader.read_i16()?];
    Ok(Self {
      plane_index,
      children
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_i32(self.plane_index)?;
    writer.write_i16(self.children[0])?;
    writer.write_i16(self.children[1])
  }
}
