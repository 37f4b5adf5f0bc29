use std::io::{Read, Result as IOResult, Write};

use bevy_math::Vec3;

use crate::lump_data::{read_vec3, write_vec3, LumpData, LumpType};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
  pub position: Vec3
}

impl LumpData for Vertex {
  fn lump_type() -> LumpType {
    LumpType::Vertices
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let position = read_vec3(reader)?;
    Ok(Self {
      position
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    write_vec3(writer, self.position)
  }
}
