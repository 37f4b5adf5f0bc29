use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Edge {
  pub vertex_index: [u16; 2]
}

impl Edge {
  pub fn first(&self) -> u16 {
    self.vertex_index[0]
  }

  pub fn second(&self) -> u16 {
    self.vertex_index[1]
  }
}

impl LumpData for Edge {
  fn lump_type() -> LumpType {
    LumpType::Edges
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let vertex_index = [
      reader.read_u16()?,
      reader.read_u16()?
    ];
    Ok(Self {
      vertex_index
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u16(self.vertex_index[0])?;
    writer.write_u16(self.vertex_index[1])
  }
}
