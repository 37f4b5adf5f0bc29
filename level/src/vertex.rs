use bevy_math::{Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Vertex {
  pub position: Vec3,
  pub normal: Vec3,
  pub uv: Vec2,
  pub lightmap_uv: Vec2,
}

impl Vertex {
  /// Bit pattern of every component, for exact deduplication.
  pub(crate) fn key(&self) -> [u32; 10] {
    let p = self.position;
    let n = self.normal;
    [
      p.x.to_bits(), p.y.to_bits(), p.z.to_bits(),
      n.x.to_bits(), n.y.to_bits(), n.z.to_bits(),
      self.uv.x.to_bits(), self.uv.y.to_bits(),
      self.lightmap_uv.x.to_bits(), self.lightmap_uv.y.to_bits(),
    ]
  }
}
