use std::io::{Result as IOResult, Write};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::CorruptionError;
use crate::{PrimitiveRead, PrimitiveWrite, StringRead};

pub const TEXTURE_NAME_LENGTH: usize = 16;
pub const MIP_LEVELS: usize = 4;
pub const PALETTE_SIZE: usize = 256;
/// Directory offset of a texture slot that carries no data at all.
pub const NO_TEXTURE_OFFSET: u32 = 0xFFFF_FFFF;

const MIP_HEADER_SIZE: usize = TEXTURE_NAME_LENGTH + 2 * 4 + MIP_LEVELS * 4;
const TRANSPARENT_INDEX: usize = 255;
const TRANSPARENT_KEY: [u8; 3] = [0, 0, 255];

/// What to do when the palette size stored after the mip data is not 256.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PalettePolicy {
  #[default]
  Warn,
  Reject,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TexturePixels {
  /// Palette indices, mip level `n` is `(width >> n) x (height >> n)`.
  pub mips: [Box<[u8]>; MIP_LEVELS],
  pub palette: Box<[[u8; 3]]>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureRecord {
  pub name: String,
  pub width: u32,
  pub height: u32,
  /// `None` if the pixels live in an external WAD.
  pub pixels: Option<TexturePixels>,
}

impl TextureRecord {
  /// Placeholder for a directory slot without any data.
  pub fn missing() -> Self {
    Self {
      name: String::new(),
      width: 0,
      height: 0,
      pixels: None
    }
  }

  pub fn external(name: &str, width: u32, height: u32) -> Self {
    Self {
      name: name.to_string(),
      width,
      height,
      pixels: None
    }
  }

  pub fn is_external(&self) -> bool {
    self.pixels.is_none()
  }

  pub fn mip_size(&self, level: usize) -> (u32, u32) {
    (self.width >> level, self.height >> level)
  }

  /// Expands a mip level to RGBA. Index 255 becomes transparent if the palette marks it
  /// with pure blue, the convention for masked textures.
  pub fn to_rgba(&self, level: usize) -> Option<Vec<u8>> {
    let pixels = self.pixels.as_ref()?;
    let indices = pixels.mips.get(level)?;
    let transparent = pixels.palette.get(TRANSPARENT_INDEX) == Some(&TRANSPARENT_KEY);

    let mut rgba = Vec::with_capacity(indices.len() * 4);
    for index in indices.iter().map(|index| *index as usize) {
      if transparent && index == TRANSPARENT_INDEX {
        rgba.extend_from_slice(&[0, 0, 0, 0]);
        continue;
      }
      let [r, g, b] = pixels.palette.get(index).copied().unwrap_or_default();
      rgba.extend_from_slice(&[r, g, b, 255]);
    }
    Some(rgba)
  }
}

/// The texture lump: a count, a table of offsets relative to the lump start and
/// one mip texture header (optionally followed by pixels and a palette) per offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureDirectory {
  textures: Vec<TextureRecord>
}

impl TextureDirectory {
  pub fn new(textures: Vec<TextureRecord>) -> Self {
    Self {
      textures
    }
  }

  pub fn read(data: &[u8], policy: PalettePolicy) -> Result<Self, CorruptionError> {
    if data.is_empty() {
      return Ok(Self::default());
    }

    let count = read_u32_at(data, 0).ok_or(CorruptionError::TextureOutOfBounds { texture: 0, offset: 0 })? as usize;
    let mut textures = Vec::with_capacity(count.min(data.len() / 4));
    for index in 0..count {
      let table_offset = 4 + index * 4;
      let offset = read_u32_at(data, table_offset)
        .ok_or(CorruptionError::TextureOutOfBounds { texture: index, offset: table_offset })?;
      if offset == NO_TEXTURE_OFFSET {
        textures.push(TextureRecord::missing());
        continue;
      }
      textures.push(read_texture(data, index, offset as usize, policy)?);
    }

    Ok(Self {
      textures
    })
  }

  pub fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u32(self.textures.len() as u32)?;

    let mut records = Vec::<u8>::new();
    let mut offset = 4 + self.textures.len() * 4;
    for texture in &self.textures {
      if texture.width == 0 && texture.height == 0 && texture.pixels.is_none() && texture.name.is_empty() {
        writer.write_u32(NO_TEXTURE_OFFSET)?;
        continue;
      }
      writer.write_u32(offset as u32)?;
      let start = records.len();
      write_texture(&mut records, texture)?;
      while (records.len() - start) % 4 != 0 {
        records.push(0u8);
      }
      offset += records.len() - start;
    }
    writer.write_all(&records)
  }

  pub fn to_bytes(&self) -> Box<[u8]> {
    let mut bytes = Vec::new();
    self.write(&mut bytes).expect("writing to a Vec never fails");
    bytes.into_boxed_slice()
  }

  pub fn textures(&self) -> &[TextureRecord] {
    &self.textures
  }

  pub fn into_textures(self) -> Vec<TextureRecord> {
    self.textures
  }

  pub fn len(&self) -> usize {
    self.textures.len()
  }

  pub fn is_empty(&self) -> bool {
    self.textures.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&TextureRecord> {
    self.textures.get(index)
  }

  /// Texture names are case insensitive.
  pub fn find(&self, name: &str) -> Option<usize> {
    self.textures.iter().position(|texture| texture.name.eq_ignore_ascii_case(name))
  }

  pub fn replace(&mut self, index: usize, texture: TextureRecord) -> Option<TextureRecord> {
    self.textures.get_mut(index).map(|slot| std::mem::replace(slot, texture))
  }
}

fn read_u32_at(data: &[u8], offset: usize) -> Option<u32> {
  let mut bytes = data.get(offset..offset.checked_add(4)?)?;
  bytes.read_u32().ok()
}

fn read_texture(data: &[u8], index: usize, offset: usize, policy: PalettePolicy) -> Result<TextureRecord, CorruptionError> {
  let out_of_bounds = |offset: usize| CorruptionError::TextureOutOfBounds { texture: index, offset };

  let mut header = offset.checked_add(MIP_HEADER_SIZE)
    .and_then(|end| data.get(offset..end))
    .ok_or(out_of_bounds(offset))?;
  let name = header.read_fixed_length_null_terminated_string(TEXTURE_NAME_LENGTH as u32).map_err(|_| out_of_bounds(offset))?;
  let width = header.read_u32().map_err(|_| out_of_bounds(offset))?;
  let height = header.read_u32().map_err(|_| out_of_bounds(offset))?;
  let mut mip_offsets = [0u32; MIP_LEVELS];
  for mip_offset in &mut mip_offsets {
    *mip_offset = header.read_u32().map_err(|_| out_of_bounds(offset))?;
  }

  let packed = mip_offsets.iter().all(|mip_offset| *mip_offset != 0);
  if !packed {
    if mip_offsets.iter().any(|mip_offset| *mip_offset != 0) {
      warn!("Texture {} ({}) has only some mip offsets set, treating it as external", index, name);
    }
    return Ok(TextureRecord::external(&name, width, height));
  }

  let mut mips: [Box<[u8]>; MIP_LEVELS] = Default::default();
  let mut mip_end = offset;
  for (level, mip) in mips.iter_mut().enumerate() {
    let start = offset.checked_add(mip_offsets[level] as usize).ok_or(out_of_bounds(offset))?;
    let size = ((width >> level) as usize).checked_mul((height >> level) as usize).ok_or(out_of_bounds(start))?;
    let end = start.checked_add(size).ok_or(out_of_bounds(start))?;
    *mip = data.get(start..end).ok_or(out_of_bounds(start))?.into();
    mip_end = end;
  }

  let mut trailer = data.get(mip_end..).unwrap_or_default();
  let palette_size = trailer.read_u16().map_err(|_| out_of_bounds(mip_end))? as usize;
  if palette_size == 0 || palette_size > PALETTE_SIZE {
    return Err(CorruptionError::InvalidPaletteSize { texture: index, size: palette_size });
  }
  if palette_size != PALETTE_SIZE {
    match policy {
      PalettePolicy::Warn => warn!("Texture {} ({}) has a palette of {} colors instead of {}", index, name, palette_size, PALETTE_SIZE),
      PalettePolicy::Reject => return Err(CorruptionError::InvalidPaletteSize { texture: index, size: palette_size }),
    }
  }
  let palette_bytes = trailer.get(..palette_size * 3).ok_or(out_of_bounds(mip_end + 2))?;
  let palette: Box<[[u8; 3]]> = palette_bytes.chunks_exact(3).map(|color| [color[0], color[1], color[2]]).collect();

  Ok(TextureRecord {
    name,
    width,
    height,
    pixels: Some(TexturePixels {
      mips,
      palette
    })
  })
}

fn write_texture(writer: &mut dyn Write, texture: &TextureRecord) -> IOResult<()> {
  writer.write_fixed_length_string(&texture.name, TEXTURE_NAME_LENGTH)?;
  writer.write_u32(texture.width)?;
  writer.write_u32(texture.height)?;

  let Some(pixels) = &texture.pixels else {
    for _ in 0..MIP_LEVELS {
      writer.write_u32(0)?;
    }
    return Ok(());
  };

  let mut mip_offset = MIP_HEADER_SIZE;
  for mip in &pixels.mips {
    writer.write_u32(mip_offset as u32)?;
    mip_offset += mip.len();
  }
  for mip in &pixels.mips {
    writer.write_all(mip)?;
  }
  writer.write_u16(pixels.palette.len() as u16)?;
  for color in pixels.palette.iter() {
    writer.write_all(color)?;
  }
  Ok(())
}
