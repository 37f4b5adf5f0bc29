use std::io::{Read, Result as IOResult, Write};

use bevy_math::Vec3;

use crate::lump_data::{read_vec3, write_vec3, LumpData, LumpType};
use crate::{PrimitiveRead, PrimitiveWrite};

/// Axis classification of a plane. Axial planes allow cheaper point tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaneType {
  X,
  Y,
  Z,
  AnyX,
  AnyY,
  AnyZ,
  Unknown(i32),
}

impl PlaneType {
  pub fn from_raw(value: i32) -> Self {
    match value {
      0 => PlaneType::X,
      1 => PlaneType::Y,
      2 => PlaneType::Z,
      3 => PlaneType::AnyX,
      4 => PlaneType::AnyY,
      5 => PlaneType::AnyZ,
      other => PlaneType::Unknown(other),
    }
  }

  pub fn to_raw(self) -> i32 {
    match self {
      PlaneType::X => 0,
      PlaneType::Y => 1,
      PlaneType::Z => 2,
      PlaneType::AnyX => 3,
      PlaneType::AnyY => 4,
      PlaneType::AnyZ => 5,
      PlaneType::Unknown(other) => other,
    }
  }

  /// The axis a plane of this type is perpendicular to, if it is axial.
  pub fn axis(self) -> Option<usize> {
    match self {
      PlaneType::X => Some(0),
      PlaneType::Y => Some(1),
      PlaneType::Z => Some(2),
      _ => None,
    }
  }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
  pub normal: Vec3,
  pub dist: f32,
  pub plane_type: PlaneType,
}

impl Plane {
  /// Signed distance of `point` to the plane, positive on the front side.
  pub fn distance_to(&self, point: Vec3) -> f32 {
    match self.plane_type.axis() {
      Some(axis) => point[axis] - self.dist,
      None => self.normal.dot(point) - self.dist,
    }
  }
}

impl LumpData for Plane {
  fn lump_type() -> LumpType {
    LumpType::Planes
  }

  fn read(reader: &mut dyn Read) -> IOResult<Self> {
    let normal = read_vec3(reader)?;
    let dist = reader.read_f32()?;
    let plane_type = PlaneType::from_raw(reader.read_i32()?);
    Ok(Self {
      normal,
      dist,
      plane_type
    })
  }

  fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    write_vec3(writer, self.normal)?;
    writer.write_f32(self.dist)?;
    writer.write_i32(self.plane_type.to_raw())
  }
}
