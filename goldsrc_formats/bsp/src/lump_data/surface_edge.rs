use std::io::{Read, Result as IOResult, Write};

use crate::lump_data::{Edge, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

/// Signed reference to an edge. The magnitude indexes the edge lump, the sign picks
/// the endpoint so that two faces can share one edge while walking it in opposite directions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SurfaceEdge {
  pub index: i32
}

impl SurfaceEdge {
  pub fn edge_index(&self) -> usize {
    self.index.unsigned_abs() as usize
  }

  pub fn is_reversed(&self) -> bool {
    self.index < 0
  }

  /// The vertex this surface edge contributes to the face outline:
  /// the first endpoint when walking forward, the second when walking backwards.
  pub fn vertex(&self, edge: &Edge) -> u16 {
    if self.is_reversed() {
      edge.second()
    } else {
      edge.first()
    }
  }
}

impl LumpData for SurfaceEdge {
  fn lump_type() -> LumpType {
    LumpType::SurfaceEdges
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let index = reader.read_i32()?;
    Ok(Self {
      index
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_i32(self.index)
  }
}
