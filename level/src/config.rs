use serde::{Deserialize, Serialize};

use bspkit_bsp::PalettePolicy;

pub const DEFAULT_LUXEL_SIZE: f32 = 16f32;
pub const DEFAULT_ATLAS_SIZE: u32 = 512;
pub const MAX_ATLAS_SIZE: u32 = 4096;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
  pub initial_size: u32,
  pub max_size: u32,
  /// RGB written into canvas area that holds no allocation.
  pub fill_color: [u8; 3],
}

impl Default for AtlasConfig {
  fn default() -> Self {
    Self {
      initial_size: DEFAULT_ATLAS_SIZE,
      max_size: MAX_ATLAS_SIZE,
      fill_color: [0, 0, 0],
    }
  }
}

/// What the builder does with a face that references data outside its lumps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaceErrorPolicy {
  /// Abort the build.
  #[default]
  Fail,
  /// Leave the face out, log it and record it in `Level::skipped_faces`.
  Skip,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// World units per lightmap texel.
  pub luxel_size: f32,
  pub dedup_vertices: bool,
  pub face_errors: FaceErrorPolicy,
  pub palette: PalettePolicy,
  pub atlas: AtlasConfig,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      luxel_size: DEFAULT_LUXEL_SIZE,
      dedup_vertices: false,
      face_errors: FaceErrorPolicy::Fail,
      palette: PalettePolicy::Warn,
      atlas: AtlasConfig::default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_json_falls_back_to_defaults() {
    let config: BuildConfig = serde_json::from_str(r#"{ "face_errors": "Skip", "atlas": { "max_size": 1024 } }"#).unwrap();
    assert_eq!(config.face_errors, FaceErrorPolicy::Skip);
    assert_eq!(config.atlas.max_size, 1024);
    assert_eq!(config.atlas.initial_size, DEFAULT_ATLAS_SIZE);
    assert_eq!(config.luxel_size, DEFAULT_LUXEL_SIZE);
    assert!(!config.dedup_vertices);
  }

  #[test]
  fn config_survives_json() {
    let config = BuildConfig {
      dedup_vertices: true,
      palette: PalettePolicy::Reject,
      ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<BuildConfig>(&json).unwrap(), config);
  }
}
