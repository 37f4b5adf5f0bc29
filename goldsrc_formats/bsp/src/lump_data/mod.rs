pub use self::brush_model::{BrushModel, MAX_MAP_HULLS};
pub use self::clip_node::{ClipNode, ClipNodeChild};
pub use self::edge::Edge;
pub use self::entity::{Entities, Entity, QuoteMode};
pub use self::face::{Face, MAX_LIGHTMAPS};
pub use self::leaf::{Contents, Leaf, AMBIENT_COUNT};
pub use self::lighting::{Lighting, LIGHT_SAMPLE_SIZE};
pub use self::mark_surface::MarkSurface;
pub use self::node::{Node, NodeChild};
pub use self::plane::{Plane, PlaneType};
pub use self::surface_edge::SurfaceEdge;
pub use self::texture::{PalettePolicy, TextureDirectory, TexturePixels, TextureRecord, MIP_LEVELS, NO_TEXTURE_OFFSET, TEXTURE_NAME_LENGTH};
pub use self::texture_info::{TextureFlags, TextureInfo};
pub use self::vertex::Vertex;
pub use self::visibility::Visibility;

use std::io::{Read, Result as IOResult, Write};

use bevy_math::Vec3;

use crate::lump::LumpType;
use crate::{PrimitiveRead, PrimitiveWrite};

mod brush_model;
mod clip_node;
mod edge;
mod entity;
mod face;
mod leaf;
mod lighting;
mod mark_surface;
mod node;
mod plane;
mod surface_edge;
mod texture;
mod texture_info;
mod vertex;
mod visibility;

/// A fixed-size record of one of the array lumps.
/// Every field is decoded explicitly at its little-endian offset.
pub trait LumpData: Sized {
  fn lump_type() -> LumpType;
  fn element_size() -> usize {
    Self::lump_type().record_size()
  }
  fn read(reader: &mut dyn Read) -> IOResult<Self>;
  fn write(&self, writer: &mut dyn Write) -> IOResult<()>;
}

pub(crate) fn read_vec3(reader: &mut dyn Read) -> IOResult<Vec3> {
  Ok(Vec3::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?))
}

pub(crate) fn write_vec3(writer: &mut dyn Write, value: Vec3) -> IOResult<()> {
  writer.write_f32(value.x)?;
  writer.write_f32(value.y)?;
  writer.write_f32(value.z)
}

pub(crate) fn read_short3(reader: &mut dyn Read) -> IOResult<[i16; 3]> {
  Ok([reader.read_i16()?, reader.read_i16()?, reader.read_i16()?])
}

pub(crate) fn write_short3(writer: &mut dyn Write, value: [i16; 3]) -> IOResult<()> {
  for component in value {
    writer.write_i16(component)?;
  }
  Ok(())
}
