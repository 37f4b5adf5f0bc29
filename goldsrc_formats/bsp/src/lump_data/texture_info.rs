use std::io::{Read, Result as IOResult, Write};

use bevy_math::{Vec2, Vec3};
use bitflags::bitflags;

use crate::lump_data::{read_vec3, write_vec3, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

bitflags! {
  #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
  pub struct TextureFlags: u32 {
    /// Sky or liquid surface, never lightmapped.
    const SPECIAL = 0x1;
  }
}

/// Projection of world space onto the texel space of a texture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureInfo {
  pub s_axis: Vec3,
  pub s_shift: f32,
  pub t_axis: Vec3,
  pub t_shift: f32,
  pub texture_index: u32,
  pub flags: TextureFlags,
}

impl TextureInfo {
  /// Texel space coordinates of a world space position, not normalized by the texture size.
  pub fn texel_coordinates(&self, position: Vec3) -> Vec2 {
    Vec2::new(
      self.s_axis.dot(position) + self.s_shift,
      self.t_axis.dot(position) + self.t_shift,
    )
  }
}

impl LumpData for TextureInfo {
  fn lump_type() -> LumpType {
    LumpType::TextureInfo
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let s_axis = read_vec3(reader)?;
    let s_shift = reader.read_f32()?;
    let t_axis = read_vec3(reader)?;
    let t_shift = reader.read_f32()?;
    let texture_index = reader.read_u32()?;
    let flags = TextureFlags::from_bits_retain(reader.read_u32()?);

    Ok(Self {
      s_axis,
      s_shift,
      t_axis,
      t_shift,
      texture_index,
      flags
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    write_vec3(writer, self.s_axis)?;
    writer.write_f32(self.s_shift)?;
    write_vec3(writer, self.t_axis)?;
    writer.write_f32(self.t_shift)?;
    writer.write_u32(self.texture_index)?;
    writer.write_u32(self.flags.bits())
  }
}
