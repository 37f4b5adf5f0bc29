//! Turns a loaded BSP map into triangle lists and a packed lightmap atlas.

pub use self::bsp_level::{BuiltModel, Level, LevelBuilder, SkippedFace};
pub use self::config::{AtlasConfig, BuildConfig, FaceErrorPolicy, DEFAULT_ATLAS_SIZE, DEFAULT_LUXEL_SIZE, MAX_ATLAS_SIZE};
pub use self::error::{BuildError, ExportError, ResourceLimitError};
pub use self::lightmap_packer::{AtlasAllocation, AtlasRect, LightmapAtlas, LuxelSize, ATLAS_SIZE_LIMIT};
pub use self::vertex::Vertex;

mod bsp_level;
mod bsp_lumps;
mod config;
mod error;
mod export;
mod lightmap_packer;
mod vertex;
