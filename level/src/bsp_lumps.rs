use bspkit_bsp::{
  BrushModel, BspFile, CorruptionError, Edge, Face, Lighting, PalettePolicy, Plane, SurfaceEdge, TextureDirectory,
  TextureInfo, Vertex,
};

/// The lumps geometry is built from, decoded once up front.
pub(super) struct BspLumps<'a> {
  pub(super) planes: Vec<Plane>,
  pub(super) vertices: Vec<Vertex>,
  pub(super) edges: Vec<Edge>,
  pub(super) surface_edges: Vec<SurfaceEdge>,
  pub(super) faces: Vec<Face>,
  pub(super) texture_infos: Vec<TextureInfo>,
  pub(super) models: Vec<BrushModel>,
  pub(super) textures: TextureDirectory,
  pub(super) lighting: Lighting<'a>,
}

impl<'a> BspLumps<'a> {
  pub(super) fn read(map: &'a BspFile, palette: PalettePolicy) -> Result<Self, CorruptionError> {
    Ok(Self {
      planes: map.planes()?,
      vertices: map.vertices()?,
      edges: map.edges()?,
      surface_edges: map.surface_edges()?,
      faces: map.faces()?,
      texture_infos: map.texture_infos()?,
      models: map.models()?,
      textures: map.textures_with_policy(palette)?,
      lighting: map.lighting(),
    })
  }
}
