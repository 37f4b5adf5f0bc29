use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

pub const MAX_LIGHTMAPS: usize = 4;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Face {
  pub plane_index: u16,
  /// Non-zero if the face normal points away from the plane normal.
  pub side: u16,
  pub first_edge: u32,
  pub edges_count: u16,
  pub texture_info: u16,
  pub styles: [u8; MAX_LIGHTMAPS],
  /// Byte offset into the lighting lump, `None` for unlit faces.
  pub light_offset: Option<u32>,
}

impl Face {
  pub fn surface_edge_range(&self) -> std::ops::Range<usize> {
    let first = self.first_edge as usize;
    first..first + self.edges_count as usize
  }
}

impl LumpData for Face {
  fn lump_type() -> LumpType {
    LumpType::Faces
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let plane_index = reader.read_u16()?;
    let side = reader.read_u16()?;
    let first_edge = reader.read_u32()?;
    let edges_count = reader.read_u16()?;
    let texture_info = reader.read_u16()?;
    let styles = [
      reader.read_u8()?,
      reader.read_u8()?,
      reader.read_u8()?,
      reader.read_u8()?,
    ];
    let light_offset = reader.read_i32()?;
    Ok(Self {
      plane_index,
      side,
      first_edge,
      edges_count,
      texture_info,
      styles,
      light_offset: u32::try_from(light_offset).ok(),
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u16(self.plane_index)?;
    writer.write_u16(self.side)?;
    writer.write_u32(self.first_edge)?;
    writer.write_u16(self.edges_count)?;
    writer.write_u16(self.texture_info)?;
    writer.write_all(&self.styles)?;
    writer.write_i32(self.light_offset.map_or(-1, |offset| offset as i32))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn negative_light_offset_means_unlit() {
    let face = Face {
      plane_index: 2,
      side: 1,
      first_edge: 10,
      edges_count: 4,
      texture_info: 3,
      styles: [0, 255, 255, 255],
      light_offset: None,
    };
    let mut bytes = Vec::new();
    face.write(&mut bytes).unwrap();
    assert_eq!(bytes.len(), Face::element_size());
    assert_eq!(&bytes[16..], &[0xff; 4]);
    assert_eq!(Face::read(&mut &bytes[..]).unwrap(), face);
    assert_eq!(face.surface_edge_range(), 10..14);
  }
}
