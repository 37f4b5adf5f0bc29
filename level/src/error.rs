use std::io::Error as IOError;

use image::ImageError;
use thiserror::Error;

use bspkit_bsp::CorruptionError;

use crate::LuxelSize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceLimitError {
  #[error("lightmap atlas cannot fit {requested:?} luxels within the maximum size {max}")]
  AtlasFull { requested: LuxelSize, max: u32 },
  #[error("invalid lightmap atlas size: initial {initial}, maximum {max}")]
  InvalidAtlasSize { initial: u32, max: u32 },
  #[error("lightmap of {requested:?} luxels is empty or has only {samples} sample bytes")]
  InvalidLightmap { requested: LuxelSize, samples: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
  #[error("face {face} of model {model}: {source}")]
  Face {
    model: usize,
    face: usize,
    #[source]
    source: CorruptionError,
  },
  #[error(transparent)]
  Corruption(#[from] CorruptionError),
  #[error(transparent)]
  ResourceLimit(#[from] ResourceLimitError),
}

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("I/O error: {0}")]
  IOError(#[from] IOError),
  #[error("failed to encode image: {0}")]
  Image(#[from] ImageError),
  #[error("texture {0} does not exist")]
  NoSuchTexture(usize),
  #[error("texture {0} has no embedded pixels")]
  ExternalTexture(usize),
}
