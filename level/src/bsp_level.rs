use std::collections::{BTreeMap, HashMap};

use bevy_math::{Vec2, Vec3};
use log::{info, warn};

use bspkit_bsp::{BspFile, CorruptionError, LumpType, TextureRecord, LIGHT_SAMPLE_SIZE, MAX_MAP_HULLS};

use super::bsp_lumps::BspLumps;
use crate::config::{BuildConfig, FaceErrorPolicy};
use crate::error::{BuildError, ResourceLimitError};
use crate::lightmap_packer::{LightmapAtlas, LuxelSize};
use crate::Vertex;

/// Geometry of one brush model. Indices point into `Level::vertices`.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltModel {
  pub min: Vec3,
  pub max: Vec3,
  pub origin: Vec3,
  pub head_nodes: [i32; MAX_MAP_HULLS],
  /// Triangle lists keyed by texture index.
  pub indices: BTreeMap<u32, Vec<u32>>,
}

impl BuiltModel {
  pub fn triangle_count(&self) -> usize {
    self.indices.values().map(|indices| indices.len() / 3).sum()
  }
}

/// A face left out under `FaceErrorPolicy::Skip`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFace {
  pub model: usize,
  pub face: usize,
  pub error: CorruptionError,
}

/// Renderable result of a map. Holds no reference to the `BspFile` it came from.
#[derive(Debug)]
pub struct Level {
  pub vertices: Vec<Vertex>,
  pub models: Vec<BuiltModel>,
  pub lightmap: LightmapAtlas,
  pub textures: Vec<TextureRecord>,
  pub skipped_faces: Vec<SkippedFace>,
}

impl Level {
  pub fn build(map: &BspFile, config: &BuildConfig) -> Result<Level, BuildError> {
    LevelBuilder::new(map, config)?.build()
  }

  /// Model 0 is the static world.
  pub fn world(&self) -> Option<&BuiltModel> {
    self.models.first()
  }
}

struct FaceLightmap<'a> {
  size: LuxelSize,
  /// Texel space minimum in luxels, rounded down.
  luxel_min: Vec2,
  samples: &'a [u8],
}

/// A face whose indices have all been checked. Emitting it can only fail on atlas space.
struct ResolvedFace<'a> {
  texture_index: u32,
  normal: Vec3,
  positions: Vec<Vec3>,
  uvs: Vec<Vec2>,
  texels: Vec<Vec2>,
  lightmap: Option<FaceLightmap<'a>>,
}

pub struct LevelBuilder<'a> {
  lumps: BspLumps<'a>,
  config: BuildConfig,
  vertices: Vec<Vertex>,
  vertex_lookup: HashMap<[u32; 10], u32>,
  lightmap: LightmapAtlas,
  skipped_faces: Vec<SkippedFace>,
}

impl<'a> LevelBuilder<'a> {
  pub fn new(map: &'a BspFile, config: &BuildConfig) -> Result<Self, BuildError> {
    Ok(Self {
      lumps: BspLumps::read(map, config.palette)?,
      config: *config,
      vertices: Vec::new(),
      vertex_lookup: HashMap::new(),
      lightmap: LightmapAtlas::new(&config.atlas)?,
      skipped_faces: Vec::new(),
    })
  }

  pub fn build(mut self) -> Result<Level, BuildError> {
    let mut models = Vec::with_capacity(self.lumps.models.len());
    for model_index in 0..self.lumps.models.len() {
      let model = self.lumps.models[model_index];
      let face_range = model.face_range();
      if face_range.end > self.lumps.faces.len() {
        return Err(CorruptionError::IndexOutOfRange {
          lump: LumpType::Faces,
          index: face_range.end as i64 - 1,
          count: self.lumps.faces.len(),
        }.into());
      }

      let mut indices = BTreeMap::<u32, Vec<u32>>::new();
      for face_index in face_range {
        match self.resolve_face(face_index) {
          Ok(Some(face)) => self.emit_face(face, &mut indices)?,
          Ok(None) => {}
          Err(error) => match self.config.face_errors {
            FaceErrorPolicy::Fail => {
              return Err(BuildError::Face {
                model: model_index,
                face: face_index,
                source: error,
              });
            }
            FaceErrorPolicy::Skip => {
              warn!("Skipping face {} of model {}: {}", face_index, model_index, error);
              self.skipped_faces.push(SkippedFace {
                model: model_index,
                face: face_index,
                error,
              });
            }
          },
        }
      }

      models.push(BuiltModel {
        min: model.min,
        max: model.max,
        origin: model.origin,
        head_nodes: model.head_nodes,
        indices,
      });
    }

    let triangles: usize = models.iter().map(|model| model.triangle_count()).sum();
    info!(
      "Built {} models with {} vertices and {} triangles, lightmap atlas {}x{} with {} used luxels",
      models.len(),
      self.vertices.len(),
      triangles,
      self.lightmap.width(),
      self.lightmap.height(),
      self.lightmap.used_area()
    );

    Ok(Level {
      vertices: self.vertices,
      models,
      lightmap: self.lightmap,
      textures: self.lumps.textures.into_textures(),
      skipped_faces: self.skipped_faces,
    })
  }

  /// Walks the face's surface edges and checks every index on the way.
  /// Returns `None` for faces without edges.
  fn resolve_face(&self, face_index: usize) -> Result<Option<ResolvedFace<'a>>, CorruptionError> {
    let lumps = &self.lumps;
    let face = &lumps.faces[face_index];
    match face.edges_count {
      0 => return Ok(None),
      1 | 2 => {
        return Err(CorruptionError::TooFewEdges {
          face: face_index,
          count: face.edges_count as usize,
        });
      }
      _ => {}
    }

    let texture_info = lookup(&lumps.texture_infos, face.texture_info as usize, LumpType::TextureInfo)?;
    let texture = lookup(lumps.textures.textures(), texture_info.texture_index as usize, LumpType::Textures)?;
    let plane = lookup(&lumps.planes, face.plane_index as usize, LumpType::Planes)?;
    let normal = if face.side != 0 { -plane.normal } else { plane.normal };

    let surface_edge_range = face.surface_edge_range();
    if surface_edge_range.end > lumps.surface_edges.len() {
      return Err(CorruptionError::IndexOutOfRange {
        lump: LumpType::SurfaceEdges,
        index: surface_edge_range.end as i64 - 1,
        count: lumps.surface_edges.len(),
      });
    }

    let texture_size = Vec2::new(texture.width.max(1) as f32, texture.height.max(1) as f32);
    let mut positions = Vec::with_capacity(surface_edge_range.len());
    let mut uvs = Vec::with_capacity(surface_edge_range.len());
    let mut texels = Vec::with_capacity(surface_edge_range.len());
    for surface_edge in &lumps.surface_edges[surface_edge_range] {
      let edge = lookup(&lumps.edges, surface_edge.edge_index(), LumpType::Edges)?;
      let vertex = lookup(&lumps.vertices, surface_edge.vertex(edge) as usize, LumpType::Vertices)?;
      let texel = texture_info.texel_coordinates(vertex.position);
      positions.push(vertex.position);
      uvs.push(texel / texture_size);
      texels.push(texel);
    }

    let lightmap = match face.light_offset {
      Some(offset) => {
        let (size, luxel_min) = self.luxel_extents(&texels);
        let samples = lumps
          .lighting
          .samples(offset as usize, size.area())
          .ok_or(CorruptionError::LightmapOutOfBounds {
            face: face_index,
            offset: offset as usize,
            length: size.area().saturating_mul(LIGHT_SAMPLE_SIZE),
          })?;
        Some(FaceLightmap {
          size,
          luxel_min,
          samples,
        })
      }
      None => None,
    };

    Ok(Some(ResolvedFace {
      texture_index: texture_info.texture_index,
      normal,
      positions,
      uvs,
      texels,
      lightmap,
    }))
  }

  /// Luxel rectangle covering all texels: `ceil(max / luxel) - floor(min / luxel) + 1` per axis.
  fn luxel_extents(&self, texels: &[Vec2]) -> (LuxelSize, Vec2) {
    let (min, max) = texels
      .iter()
      .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(min, max), texel| (min.min(*texel), max.max(*texel)));
    let luxel_min = (min / self.config.luxel_size).floor();
    let luxel_max = (max / self.config.luxel_size).ceil();
    // NaN or inverted extents from broken texture axes still yield a 1x1 lightmap.
    let extent = (luxel_max - luxel_min + Vec2::ONE).max(Vec2::ONE);
    (LuxelSize::new(extent.x as u32, extent.y as u32), luxel_min)
  }

  fn emit_face(&mut self, face: ResolvedFace<'_>, indices: &mut BTreeMap<u32, Vec<u32>>) -> Result<(), ResourceLimitError> {
    let lightmap_uvs: Vec<Vec2> = match &face.lightmap {
      Some(lightmap) => {
        let allocation = self.lightmap.allocate(lightmap.size, lightmap.samples)?;
        if allocation.growths != 0 {
          self.rescale_lightmap_uvs(0.5f32.powi(allocation.growths as i32));
        }
        let luxel_size = self.config.luxel_size;
        let size = Vec2::new(lightmap.size.width as f32, lightmap.size.height as f32);
        let extent = allocation.uv_end - allocation.uv_start;
        face
          .texels
          .iter()
          .map(|texel| {
            let local = (*texel / luxel_size - lightmap.luxel_min + 0.5f32) / size;
            allocation.uv_start + local * extent
          })
          .collect()
      }
      None => vec![Vec2::ZERO; face.positions.len()],
    };

    let mut face_indices = Vec::with_capacity(face.positions.len());
    for ((position, uv), lightmap_uv) in face.positions.iter().zip(&face.uvs).zip(&lightmap_uvs) {
      face_indices.push(self.push_vertex(Vertex {
        position: *position,
        normal: face.normal,
        uv: *uv,
        lightmap_uv: *lightmap_uv,
      }));
    }

    // Fan around the first vertex, keeping the winding of the surface edges.
    let texture_indices = indices.entry(face.texture_index).or_default();
    for k in 2..face_indices.len() {
      texture_indices.extend_from_slice(&[face_indices[0], face_indices[k - 1], face_indices[k]]);
    }
    Ok(())
  }

  fn push_vertex(&mut self, vertex: Vertex) -> u32 {
    let index = self.vertices.len() as u32;
    if self.config.dedup_vertices {
      if let Some(existing) = self.vertex_lookup.get(&vertex.key()) {
        return *existing;
      }
      self.vertex_lookup.insert(vertex.key(), index);
    }
    self.vertices.push(vertex);
    index
  }

  /// The atlas grew, so everything issued so far now covers a smaller part of it.
  fn rescale_lightmap_uvs(&mut self, scale: f32) {
    for vertex in &mut self.vertices {
      vertex.lightmap_uv *= scale;
    }
    if self.config.dedup_vertices {
      self.vertex_lookup.clear();
      for (index, vertex) in self.vertices.iter().enumerate() {
        self.vertex_lookup.entry(vertex.key()).or_insert(index as u32);
      }
    }
  }
}

fn lookup<T>(items: &[T], index: usize, lump: LumpType) -> Result<&T, CorruptionError> {
  items.get(index).ok_or(CorruptionError::IndexOutOfRange {
    lump,
    index: index as i64,
    count: items.len(),
  })
}
