use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{read_short3, write_short3, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Contents {
  Empty,
  Solid,
  Water,
  Slime,
  Lava,
  Sky,
  Origin,
  Clip,
  Current0,
  Current90,
  Current180,
  Current270,
  CurrentUp,
  CurrentDown,
  Translucent,
  Unknown(i32),
}

impl Contents {
  pub fn from_raw(value: i32) -> Self {
    match value {
      -1 => Contents::Empty,
      -2 => Contents::Solid,
      -3 => Contents::Water,
      -4 => Contents::Slime,
      -5 => Contents::Lava,
      -6 => Contents::Sky,
      -7 => Contents::Origin,
      -8 => Contents::Clip,
      -9 => Contents::Current0,
      -10 => Contents::Current90,
      -11 => Contents::Current180,
      -12 => Contents::Current270,
      -13 => Contents::CurrentUp,
      -14 => Contents::CurrentDown,
      -15 => Contents::Translucent,
      other => Contents::Unknown(other),
    }
  }

  pub fn to_raw(self) -> i32 {
    match self {
      Contents::Empty => -1,
      Contents::Solid => -2,
      Contents::Water => -3,
      Contents::Slime => -4,
      Contents::Lava => -5,
      Contents::Sky => -6,
      Contents::Origin => -7,
      Contents::Clip => -8,
      Contents::Current0 => -9,
      Contents::Current90 => -10,
      Contents::Current180 => -11,
      Contents::Current270 => -12,
      Contents::CurrentUp => -13,
      Contents::CurrentDown => -14,
      Contents::Translucent => -15,
      Contents::Unknown(other) => other,
    }
  }

  pub fn is_liquid(self) -> bool {
    matches!(self, Contents::Water | Contents::Slime | Contents::Lava)
  }
}

pub const AMBIENT_COUNT: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
  pub contents: Contents,
  /// Byte offset into the visibility lump, `None` if the leaf has no visibility data.
  pub visibility_offset: Option<u32>,
  pub mins: [i16; 3],
  pub maxs: [i16; 3],
  pub first_mark_surface: u16,
  pub mark_surfaces_count: u16,
  pub ambient_levels: [u8; AMBIENT_COUNT],
}

impl LumpData for Leaf {
  fn lump_type() -> LumpType {
    LumpType::Leaves
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let contents = Contents::from_raw(reader.read_i32()?);
    let visibility_offset = reader.read_i32()?;
    let mins = read_short3(reader)?;
    let maxs = read_short3(reader)?;
    let first_mark_surface = reader.read_u16()?;
    let mark_surfaces_count = reader.read_u16()?;
    let mut ambient_levels = [0u8; AMBIENT_COUNT];
    for level in &mut ambient_levels {
      *level = reader.read_u8()?;
    }

    Ok(Self {
      contents,
      visibility_offset: u32::try_from(visibility_offset).ok(),
      mins,
      maxs,
      first_mark_surface,
      mark_surfaces_count,
      ambient_levels,
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_i32(self.contents.to_raw())?;
    writer.write_i32(self.visibility_offset.map_or(-1, |offset| offset as i32))?;
    write_short3(writer, self.mins)?;
    write_short3(writer, self.maxs)?;
    writer.write_u16(self.first_mark_surface)?;
    writer.write_u16(self.mark_surfaces_count)?;
    writer.write_all(&self.ambient_levels)
  }
}
