use std::io::{Read, Result as IOResult, Write};

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

use crate::{PrimitiveRead, PrimitiveWrite};

/// Directory entry of a single lump. Offsets are absolute file offsets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Lump {
  pub file_offset: u32,
  pub file_length: u32,
}

impl Lump {
  pub const SIZE: usize = 8;

  pub fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let file_offset = reader.read_u32()?;
    let file_length = reader.read_u32()?;

    Ok(Self {
      file_offset,
      file_length,
    })
  }

  pub fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u32(self.file_offset)?;
    writer.write_u32(self.file_length)
  }

  pub fn end(&self) -> u64 {
    self.file_offset as u64 + self.file_length as u64
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumCountMacro)]
#[repr(u8)]
pub enum LumpType {
  Entities = 0,
  Planes = 1,
  Textures = 2,
  Vertices = 3,
  Visibility = 4,
  Nodes = 5,
  TextureInfo = 6,
  Faces = 7,
  Lighting = 8,
  ClipNodes = 9,
  Leaves = 10,
  MarkSurfaces = 11,
  Edges = 12,
  SurfaceEdges = 13,
  Models = 14,
}

pub const LUMP_COUNT: usize = LumpType::COUNT;

impl LumpType {
  /// Size of a single record. Blob lumps (entity text, textures, visibility and
  /// lighting samples) are counted in bytes.
  pub const fn record_size(self) -> usize {
    match self {
      LumpType::Entities | LumpType::Textures | LumpType::Visibility | LumpType::Lighting => 1,
      LumpType::Planes => 20,
      LumpType::Vertices => 12,
      LumpType::Nodes => 24,
      LumpType::TextureInfo => 40,
      LumpType::Faces => 20,
      LumpType::ClipNodes => 8,
      LumpType::Leaves => 28,
      LumpType::MarkSurfaces => 2,
      LumpType::Edges => 4,
      LumpType::SurfaceEdges => 4,
      LumpType::Models => 64,
    }
  }

  pub const fn is_blob(self) -> bool {
    matches!(self, LumpType::Entities | LumpType::Textures | LumpType::Visibility | LumpType::Lighting)
  }

  /// Unlit, unvised or hull-less maps and maps that take all textures from WADs
  /// leave these empty.
  pub const fn may_be_empty(self) -> bool {
    matches!(self,
      LumpType::Entities
      | LumpType::Textures
      | LumpType::Visibility
      | LumpType::Lighting
      | LumpType::ClipNodes
      | LumpType::MarkSurfaces
    )
  }
}

/// Maximum record count (byte count for blob lumps) per lump type.
/// `None` means the lump is not limited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumpLimits {
  max: [Option<usize>; LUMP_COUNT],
}

impl LumpLimits {
  /// The limits documented for the GoldSrc engine and its compile tools.
  pub const GOLDSRC: LumpLimits = LumpLimits {
    max: [
      Some(128 * 1024), // entities
      Some(32767),      // planes
      Some(0x200000),   // textures
      Some(65535),      // vertices
      Some(0x200000),   // visibility
      Some(32767),      // nodes
      Some(8192),       // texture info
      Some(65535),      // faces
      Some(0x200000),   // lighting
      Some(32767),      // clip nodes
      Some(8192),       // leaves
      Some(65535),      // mark surfaces
      Some(256000),     // edges
      Some(512000),     // surface edges
      Some(400),        // models
    ],
  };

  pub const UNBOUNDED: LumpLimits = LumpLimits {
    max: [None; LUMP_COUNT],
  };

  pub const fn get(&self, lump: LumpType) -> Option<usize> {
    self.max[lump as usize]
  }

  pub fn with(mut self, lump: LumpType, max: Option<usize>) -> Self {
    self.max[lump as usize] = max;
    self
  }
}

impl Default for LumpLimits {
  fn default() -> Self {
    Self::GOLDSRC
  }
}
