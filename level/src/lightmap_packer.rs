use bevy_math::Vec2;
use bitvec::prelude::*;
use log::{info, trace};

use bspkit_bsp::LIGHT_SAMPLE_SIZE;

use crate::config::AtlasConfig;
use crate::error::ResourceLimitError;

/// Largest edge length an atlas may be configured with. Texel indices stay within `u32`.
pub const ATLAS_SIZE_LIMIT: u32 = 1 << 15;

/// Dimensions of a face lightmap in luxels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LuxelSize {
  pub width: u32,
  pub height: u32,
}

impl LuxelSize {
  pub fn new(width: u32, height: u32) -> Self {
    Self { width, height }
  }

  pub fn area(&self) -> usize {
    (self.width as usize).saturating_mul(self.height as usize)
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasRect {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl AtlasRect {
  pub fn area(&self) -> u64 {
    self.width as u64 * self.height as u64
  }

  pub fn overlaps(&self, other: &AtlasRect) -> bool {
    self.x < other.x + other.width
      && other.x < self.x + self.width
      && self.y < other.y + other.height
      && other.y < self.y + self.height
  }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtlasAllocation {
  pub rect: AtlasRect,
  pub uv_start: Vec2,
  pub uv_end: Vec2,
  /// How often the atlas doubled in size to make room for this allocation.
  /// Every UV handed out before it has to be scaled by `0.5^growths`.
  pub growths: u32,
}

/// Growable RGB canvas that face lightmaps are packed into.
///
/// Placement is a row-major first fit. When nothing fits, the canvas doubles in both
/// dimensions and the old content stays in the top left quadrant, so earlier UVs remain
/// valid after being halved.
#[derive(Debug)]
pub struct LightmapAtlas {
  config: AtlasConfig,
  width: u32,
  height: u32,
  data: Box<[u8]>,
  occupancy: BitVec,
  allocations: Vec<AtlasRect>,
  used_area: u64,
  growths: u32,
}

impl LightmapAtlas {
  pub fn new(config: &AtlasConfig) -> Result<Self, ResourceLimitError> {
    let invalid = ResourceLimitError::InvalidAtlasSize {
      initial: config.initial_size,
      max: config.max_size,
    };
    if config.initial_size == 0
      || config.initial_size > config.max_size
      || config.max_size > ATLAS_SIZE_LIMIT
      || canvas_len(config.max_size, config.max_size).is_none()
    {
      return Err(invalid);
    }
    let size = config.initial_size;
    let texels = canvas_len(size, size).ok_or(invalid)?;
    Ok(Self {
      config: *config,
      width: size,
      height: size,
      data: filled_canvas(texels, config.fill_color),
      occupancy: bitvec![0; texels],
      allocations: Vec::new(),
      used_area: 0,
      growths: 0,
    })
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  /// Tightly packed RGB rows.
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  pub fn occupancy(&self) -> &BitSlice {
    &self.occupancy
  }

  pub fn allocations(&self) -> &[AtlasRect] {
    &self.allocations
  }

  pub fn used_area(&self) -> u64 {
    self.used_area
  }

  pub fn growths(&self) -> u32 {
    self.growths
  }

  pub fn is_occupied(&self, x: u32, y: u32) -> bool {
    x < self.width && y < self.height && self.occupancy[self.texel_index(x, y)]
  }

  fn texel_index(&self, x: u32, y: u32) -> usize {
    y as usize * self.width as usize + x as usize
  }

  /// Finds room for `size` luxels, copies the RGB `samples` in and returns the normalized
  /// rectangle. Grows the canvas as often as needed up to the configured maximum.
  pub fn allocate(&mut self, size: LuxelSize, samples: &[u8]) -> Result<AtlasAllocation, ResourceLimitError> {
    if size.width == 0 || size.height == 0 {
      return Err(ResourceLimitError::InvalidLightmap { requested: size, samples: samples.len() });
    }
    let max = self.config.max_size;
    if size.width > max || size.height > max {
      return Err(ResourceLimitError::AtlasFull { requested: size, max });
    }
    if samples.len() < size.area() * LIGHT_SAMPLE_SIZE {
      return Err(ResourceLimitError::InvalidLightmap { requested: size, samples: samples.len() });
    }

    let mut growths = 0u32;
    let mut excluded: Option<AtlasRect> = None;
    let (x, y) = loop {
      if let Some(spot) = self.find_space(size, excluded) {
        break spot;
      }
      if self.width * 2 > max || self.height * 2 > max {
        return Err(ResourceLimitError::AtlasFull { requested: size, max });
      }
      excluded = Some(AtlasRect {
        x: 0,
        y: 0,
        width: self.width,
        height: self.height,
      });
      self.grow();
      growths += 1;
    };

    let rect = AtlasRect {
      x,
      y,
      width: size.width,
      height: size.height,
    };
    self.place(&rect, samples);
    trace!("Allocated {}x{} lightmap at ({}, {})", rect.width, rect.height, rect.x, rect.y);

    let atlas_size = Vec2::new(self.width as f32, self.height as f32);
    Ok(AtlasAllocation {
      rect,
      uv_start: Vec2::new(x as f32, y as f32) / atlas_size,
      uv_end: Vec2::new((x + size.width) as f32, (y + size.height) as f32) / atlas_size,
      growths,
    })
  }

  fn find_space(&self, size: LuxelSize, excluded: Option<AtlasRect>) -> Option<(u32, u32)> {
    if size.width > self.width || size.height > self.height {
      return None;
    }
    for y in 0..=self.height - size.height {
      let mut x = 0u32;
      while x + size.width <= self.width {
        let candidate = AtlasRect {
          x,
          y,
          width: size.width,
          height: size.height,
        };
        if let Some(excluded) = excluded.filter(|excluded| excluded.overlaps(&candidate)) {
          x = excluded.x + excluded.width;
          continue;
        }
        match self.last_occupied_column(&candidate) {
          None => return Some((x, y)),
          Some(column) => x = column + 1,
        }
      }
    }
    None
  }

  /// Rightmost occupied column inside `rect`, any candidate starting left of it collides too.
  fn last_occupied_column(&self, rect: &AtlasRect) -> Option<u32> {
    let mut last: Option<u32> = None;
    for row in rect.y..rect.y + rect.height {
      let start = self.texel_index(rect.x, row);
      let row_bits = &self.occupancy[start..start + rect.width as usize];
      if let Some(offset) = row_bits.last_one() {
        let column = rect.x + offset as u32;
        last = Some(last.map_or(column, |last| last.max(column)));
      }
    }
    last
  }

  fn place(&mut self, rect: &AtlasRect, samples: &[u8]) {
    let row_length = rect.width as usize * LIGHT_SAMPLE_SIZE;
    for row in 0..rect.height {
      let bit_start = self.texel_index(rect.x, rect.y + row);
      self.occupancy[bit_start..bit_start + rect.width as usize].fill(true);

      let dst = bit_start * LIGHT_SAMPLE_SIZE;
      let src = row as usize * row_length;
      self.data[dst..dst + row_length].copy_from_slice(&samples[src..src + row_length]);
    }
    self.allocations.push(*rect);
    self.used_area += rect.area();
  }

  fn grow(&mut self) {
    let (old_width, old_height) = (self.width, self.height);
    let (width, height) = (old_width * 2, old_height * 2);

    // `new` checked that a canvas of the maximum size is addressable.
    let texels = width as usize * height as usize;
    let mut data = filled_canvas(texels, self.config.fill_color);
    let mut occupancy = bitvec![0; texels];
    let old_row_length = old_width as usize * LIGHT_SAMPLE_SIZE;
    for row in 0..old_height as usize {
      let src = row * old_row_length;
      let dst = row * width as usize * LIGHT_SAMPLE_SIZE;
      data[dst..dst + old_row_length].copy_from_slice(&self.data[src..src + old_row_length]);

      let src_bits = row * old_width as usize;
      let dst_bits = row * width as usize;
      occupancy[dst_bits..dst_bits + old_width as usize]
        .copy_from_bitslice(&self.occupancy[src_bits..src_bits + old_width as usize]);
    }

    self.width = width;
    self.height = height;
    self.data = data;
    self.occupancy = occupancy;
    self.growths += 1;
    info!("Lightmap atlas grew from {}x{} to {}x{}", old_width, old_height, width, height);
  }

  /// Expands the canvas to RGBA with an opaque alpha channel.
  pub fn to_rgba(&self) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(self.data.len() / LIGHT_SAMPLE_SIZE * 4);
    for sample in self.data.chunks_exact(LIGHT_SAMPLE_SIZE) {
      rgba.extend_from_slice(sample);
      rgba.push(255);
    }
    rgba
  }
}

/// Number of texels of a `width` x `height` canvas, if its RGB bytes can be addressed.
fn canvas_len(width: u32, height: u32) -> Option<usize> {
  let texels = (width as usize).checked_mul(height as usize)?;
  texels.checked_mul(LIGHT_SAMPLE_SIZE)?;
  Some(texels)
}

fn filled_canvas(texels: usize, color: [u8; 3]) -> Box<[u8]> {
  color.iter().copied().cycle().take(texels * LIGHT_SAMPLE_SIZE).collect()
}
