use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkSurface {
  pub face_index: u16
}

impl LumpData for MarkSurface {
  fn lump_type() -> LumpType {
    LumpType::MarkSurfaces
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    Ok(Self {
      face_index: reader.read_u16()?
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u16(self.face_index)
  }
}
