use std::path::Path;

use image::ColorType;
use log::debug;

use crate::error::ExportError;
use crate::Level;

impl Level {
  /// Writes the lightmap atlas as RGBA, the format is picked from the file extension.
  pub fn save_lightmap<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
    debug!("Saving {}x{} lightmap to {:?}", self.lightmap.width(), self.lightmap.height(), path.as_ref());
    image::save_buffer(path, &self.lightmap.to_rgba(), self.lightmap.width(), self.lightmap.height(), ColorType::Rgba8)?;
    Ok(())
  }

  /// Writes mip level 0 of an embedded texture.
  pub fn save_texture<P: AsRef<Path>>(&self, index: usize, path: P) -> Result<(), ExportError> {
    let texture = self.textures.get(index).ok_or(ExportError::NoSuchTexture(index))?;
    let rgba = texture.to_rgba(0).ok_or(ExportError::ExternalTexture(index))?;
    debug!("Saving texture {} ({}) to {:?}", index, texture.name, path.as_ref());
    image::save_buffer(path, &rgba, texture.width, texture.height, ColorType::Rgba8)?;
    Ok(())
  }
}
