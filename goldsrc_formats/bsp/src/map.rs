use std::fs::File;
use std::io::{BufReader, BufWriter, Error as IOError, ErrorKind, Read, Result as IOResult, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use strum::IntoEnumIterator;

use crate::error::{BspError, CorruptionError, ParseError};
use crate::lump::{Lump, LumpLimits, LumpType, LUMP_COUNT};
use crate::lump_data::{
  BrushModel, ClipNode, Edge, Entities, Face, Leaf, Lighting, LumpData, MarkSurface, Node, PalettePolicy, Plane,
  QuoteMode, SurfaceEdge, TextureDirectory, TextureInfo, Vertex, Visibility,
};
use crate::map_header::{MapHeader, BSP_VERSION, HEADER_SIZE};
use crate::RawDataRead;

/// A loaded map: one owned byte buffer per lump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BspFile {
  version: u32,
  lumps: [Box<[u8]>; LUMP_COUNT],
}

impl BspFile {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<BspFile, BspError> {
    Self::open_with_limits(path, &LumpLimits::default())
  }

  pub fn open_with_limits<P: AsRef<Path>>(path: P, limits: &LumpLimits) -> Result<BspFile, BspError> {
    debug!("Loading map {:?}", path.as_ref());
    let file = File::open(path)?;
    Self::read_with_limits(BufReader::new(file), limits)
  }

  pub fn read<R: Read + Seek>(reader: R) -> Result<BspFile, BspError> {
    Self::read_with_limits(reader, &LumpLimits::default())
  }

  /// Reads the header and every lump, then validates the result.
  /// Nothing is returned unless the whole file is structurally sound.
  pub fn read_with_limits<R: Read + Seek>(mut reader: R, limits: &LumpLimits) -> Result<BspFile, BspError> {
    let file_length = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;
    let header = MapHeader::read(&mut reader, file_length)?;

    let mut lumps: [Box<[u8]>; LUMP_COUNT] = Default::default();
    for lump_type in LumpType::iter() {
      let lump = header.lumps[lump_type as usize];
      if lump.file_length == 0 {
        continue;
      }
      if lump.end() > file_length {
        return Err(CorruptionError::LumpOutOfBounds {
          lump: lump_type,
          offset: lump.file_offset,
          length: lump.file_length,
          file_length,
        }.into());
      }
      debug!("Reading lump {} at offset {} with length {}", lump_type, lump.file_offset, lump.file_length);
      reader.seek(SeekFrom::Start(lump.file_offset as u64))?;
      lumps[lump_type as usize] = reader.read_data_exact(lump.file_length as usize)?;
    }

    let map = Self {
      version: header.version,
      lumps,
    };
    map.validate(limits)?;
    Ok(map)
  }

  /// Assembles a map from raw lump contents without validating them.
  pub fn from_lumps(lumps: [Box<[u8]>; LUMP_COUNT]) -> BspFile {
    Self {
      version: BSP_VERSION,
      lumps,
    }
  }

  pub fn version(&self) -> u32 {
    self.version
  }

  pub fn lump(&self, lump: LumpType) -> &[u8] {
    &self.lumps[lump as usize]
  }

  pub fn lump_len(&self, lump: LumpType) -> usize {
    self.lumps[lump as usize].len()
  }

  pub fn set_lump(&mut self, lump: LumpType, data: Box<[u8]>) {
    self.lumps[lump as usize] = data;
  }

  /// Number of records in the lump, bytes for blob lumps.
  pub fn record_count(&self, lump: LumpType) -> Result<usize, CorruptionError> {
    let length = self.lump_len(lump);
    let record_size = lump.record_size();
    if length % record_size != 0 {
      return Err(CorruptionError::LumpSizeMismatch { lump, length, record_size });
    }
    Ok(length / record_size)
  }

  pub fn validate(&self, limits: &LumpLimits) -> Result<(), CorruptionError> {
    for lump in LumpType::iter() {
      let count = self.record_count(lump)?;
      if count == 0 && !lump.may_be_empty() {
        return Err(CorruptionError::MissingLump { lump });
      }
      if let Some(max) = limits.get(lump) {
        if count > max {
          return Err(CorruptionError::LimitExceeded { lump, count, max });
        }
      }
    }
    Ok(())
  }

  pub fn read_lump_data<T: LumpData>(&self) -> Result<Vec<T>, CorruptionError> {
    let lump = T::lump_type();
    let count = self.record_count(lump)?;
    let mut reader = self.lump(lump);
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
      // The length was checked above, a short read means a broken LumpData impl.
      let element = T::read(&mut reader).map_err(|_| CorruptionError::LumpSizeMismatch {
        lump,
        length: self.lump_len(lump),
        record_size: T::element_size(),
      })?;
      elements.push(element);
    }
    Ok(elements)
  }

  pub fn planes(&self) -> Result<Vec<Plane>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn vertices(&self) -> Result<Vec<Vertex>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn nodes(&self) -> Result<Vec<Node>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn texture_infos(&self) -> Result<Vec<TextureInfo>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn faces(&self) -> Result<Vec<Face>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn clip_nodes(&self) -> Result<Vec<ClipNode>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn leaves(&self) -> Result<Vec<Leaf>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn mark_surfaces(&self) -> Result<Vec<MarkSurface>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn edges(&self) -> Result<Vec<Edge>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn surface_edges(&self) -> Result<Vec<SurfaceEdge>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn models(&self) -> Result<Vec<BrushModel>, CorruptionError> {
    self.read_lump_data()
  }

  pub fn textures(&self) -> Result<TextureDirectory, CorruptionError> {
    self.textures_with_policy(PalettePolicy::default())
  }

  pub fn textures_with_policy(&self, policy: PalettePolicy) -> Result<TextureDirectory, CorruptionError> {
    TextureDirectory::read(self.lump(LumpType::Textures), policy)
  }

  pub fn replace_textures(&mut self, textures: &TextureDirectory) {
    self.set_lump(LumpType::Textures, textures.to_bytes());
  }

  pub fn entities(&self, mode: QuoteMode) -> Result<Entities, ParseError> {
    Entities::read(self.lump(LumpType::Entities), mode)
  }

  pub fn lighting(&self) -> Lighting<'_> {
    Lighting::new(self.lump(LumpType::Lighting))
  }

  pub fn visibility(&self) -> Visibility<'_> {
    Visibility::new(self.lump(LumpType::Visibility))
  }

  /// Writes the header followed by all lumps in directory order.
  /// Offsets are recomputed, nothing of the original layout is kept.
  pub fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    let header = MapHeader {
      version: self.version,
      lumps: sequential_directory(self.lumps.iter().map(|data| data.len()))?,
    };
    header.write(writer)?;
    for data in &self.lumps {
      writer.write_all(data)?;
    }
    Ok(())
  }

  pub fn save<P: AsRef<Path>>(&self, path: P) -> IOResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    self.write(&mut writer)?;
    writer.flush()
  }
}

/// Lays lumps out back to back after the header. Every offset and length must fit the
/// 32-bit directory fields.
fn sequential_directory(lengths: impl Iterator<Item = usize>) -> IOResult<[Lump; LUMP_COUNT]> {
  let mut lumps = [Lump::default(); LUMP_COUNT];
  let mut offset = HEADER_SIZE as u32;
  for (lump_type, (entry, length)) in LumpType::iter().zip(lumps.iter_mut().zip(lengths)) {
    let too_large = || {
      IOError::new(
        ErrorKind::InvalidInput,
        format!("lump {} with length {} does not fit into a 32-bit map file", lump_type, length),
      )
    };
    let file_length = u32::try_from(length).map_err(|_| too_large())?;
    *entry = Lump {
      file_offset: offset,
      file_length,
    };
    offset = offset.checked_add(file_length).ok_or_else(too_large)?;
  }
  Ok(lumps)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::FormatError;
  use crate::lump_data::{Contents, PlaneType, TextureFlags, TextureRecord};
  use bevy_math::Vec3;
  use std::io::Cursor;

  fn encode<T: LumpData>(records: &[T]) -> Box<[u8]> {
    let mut bytes = Vec::new();
    for record in records {
      record.write(&mut bytes).unwrap();
    }
    bytes.into_boxed_slice()
  }

  fn minimal_map() -> BspFile {
    let mut lumps: [Box<[u8]>; LUMP_COUNT] = Default::default();
    lumps[LumpType::Entities as usize] = b"{\n\"classname\" \"worldspawn\"\n}\n\0".to_vec().into_boxed_slice();
    lumps[LumpType::Planes as usize] = encode(&[Plane { normal: Vec3::Z, dist: 0.0, plane_type: PlaneType::Z }]);
    lumps[LumpType::Vertices as usize] = encode(&[
      Vertex { position: Vec3::new(0.0, 0.0, 0.0) },
      Vertex { position: Vec3::new(64.0, 0.0, 0.0) },
      Vertex { position: Vec3::new(64.0, 64.0, 0.0) },
    ]);
    lumps[LumpType::Nodes as usize] = encode(&[Node { plane_index: 0, children: [-1, -2], ..Default::default() }]);
    lumps[LumpType::TextureInfo as usize] = encode(&[TextureInfo {
      s_axis: Vec3::X,
      s_shift: 0.0,
      t_axis: Vec3::Y,
      t_shift: 0.0,
      texture_index: 0,
      flags: TextureFlags::empty(),
    }]);
    lumps[LumpType::Faces as usize] = encode(&[Face { first_edge: 0, edges_count: 3, ..Default::default() }]);
    lumps[LumpType::Leaves as usize] = encode(&[Leaf {
      contents: Contents::Solid,
      visibility_offset: None,
      mins: [0; 3],
      maxs: [0; 3],
      first_mark_surface: 0,
      mark_surfaces_count: 0,
      ambient_levels: [0; 4],
    }]);
    lumps[LumpType::Edges as usize] = encode(&[
      Edge { vertex_index: [0, 0] },
      Edge { vertex_index: [0, 1] },
      Edge { vertex_index: [1, 2] },
      Edge { vertex_index: [2, 0] },
    ]);
    lumps[LumpType::SurfaceEdges as usize] = encode(&[SurfaceEdge { index: 1 }, SurfaceEdge { index: 2 }, SurfaceEdge { index: 3 }]);
    lumps[LumpType::Models as usize] = encode(&[BrushModel {
      min: Vec3::ZERO,
      max: Vec3::new(64.0, 64.0, 0.0),
      origin: Vec3::ZERO,
      head_nodes: [0, 0, 0, 0],
      visible_leaves: 0,
      first_face: 0,
      faces_count: 1,
    }]);
    BspFile::from_lumps(lumps)
  }

  fn to_bytes(map: &BspFile) -> Vec<u8> {
    let mut bytes = Vec::new();
    map.write(&mut bytes).unwrap();
    bytes
  }

  #[test]
  fn write_then_read_keeps_every_lump() {
    let map = minimal_map();
    let bytes = to_bytes(&map);
    let read = BspFile::read(Cursor::new(&bytes)).unwrap();
    assert_eq!(read, map);
    assert_eq!(read.record_count(LumpType::Edges).unwrap(), 4);
    assert_eq!(read.faces().unwrap()[0].edges_count, 3);
    assert_eq!(read.entities(QuoteMode::Legacy).unwrap().len(), 1);
  }

  #[test]
  fn written_offsets_are_sequential() {
    let map = minimal_map();
    let bytes = to_bytes(&map);
    let header = MapHeader::read(&mut &bytes[..], bytes.len() as u64).unwrap();
    let mut expected = HEADER_SIZE as u32;
    for lump in LumpType::iter() {
      assert_eq!(header.lumps[lump as usize].file_offset, expected);
      expected += map.lump_len(lump) as u32;
    }
    assert_eq!(expected as usize, bytes.len());
  }

  #[test]
  fn oversized_lumps_cannot_be_written() {
    let mut lengths = [0usize; LUMP_COUNT];
    lengths[2] = u32::MAX as usize - HEADER_SIZE;
    let directory = sequential_directory(lengths.iter().copied()).unwrap();
    assert_eq!(directory[3].file_offset, u32::MAX);

    lengths[5] = 1;
    let error = sequential_directory(lengths.iter().copied()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidInput);

    let mut lengths = [0usize; LUMP_COUNT];
    lengths[0] = u32::MAX as usize + 1;
    let error = sequential_directory(lengths.iter().copied()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidInput);
  }

  #[test]
  fn swapped_magic_is_wrong_endianness() {
    let mut bytes = to_bytes(&minimal_map());
    bytes[..4].copy_from_slice(&BSP_VERSION.to_be_bytes());
    match BspFile::read(Cursor::new(&bytes)) {
      Err(BspError::Format(FormatError::WrongEndianness { .. })) => {}
      other => panic!("expected wrong endianness, got {:?}", other),
    }

    bytes[..4].copy_from_slice(b"VBSP");
    match BspFile::read(Cursor::new(&bytes)) {
      Err(BspError::Format(FormatError::BadMagic { .. })) => {}
      other => panic!("expected bad magic, got {:?}", other),
    }
  }

  #[test]
  fn short_files_are_typed_errors() {
    match BspFile::read(Cursor::new(vec![30u8, 0])) {
      Err(BspError::Format(FormatError::BadMagic { found: 30, .. })) => {}
      other => panic!("expected bad magic, got {:?}", other),
    }
    match BspFile::read(Cursor::new(Vec::<u8>::new())) {
      Err(BspError::Format(FormatError::BadMagic { found: 0, .. })) => {}
      other => panic!("expected bad magic, got {:?}", other),
    }

    let bytes = to_bytes(&minimal_map());
    match BspFile::read(Cursor::new(&bytes[..14])) {
      Err(BspError::Corruption(CorruptionError::TruncatedHeader { file_length: 14 })) => {}
      other => panic!("expected truncated header, got {:?}", other),
    }
  }

  #[test]
  fn partial_record_is_corruption() {
    let mut map = minimal_map();
    map.set_lump(LumpType::Edges, vec![0u8; 6].into_boxed_slice());
    let bytes = to_bytes(&map);
    match BspFile::read(Cursor::new(&bytes)) {
      Err(BspError::Corruption(CorruptionError::LumpSizeMismatch { lump: LumpType::Edges, length: 6, record_size: 4 })) => {}
      other => panic!("expected size mismatch, got {:?}", other),
    }
  }

  #[test]
  fn lump_past_end_of_file_is_corruption() {
    let mut bytes = to_bytes(&minimal_map());
    let models_entry = 4 + LumpType::Models as usize * Lump::SIZE;
    bytes[models_entry + 4..models_entry + 8].copy_from_slice(&1000u32.to_le_bytes());
    match BspFile::read(Cursor::new(&bytes)) {
      Err(BspError::Corruption(CorruptionError::LumpOutOfBounds { lump: LumpType::Models, length: 1000, .. })) => {}
      other => panic!("expected out of bounds lump, got {:?}", other),
    }
  }

  #[test]
  fn missing_required_lump_and_limits() {
    let mut map = minimal_map();
    assert_eq!(map.validate(&LumpLimits::GOLDSRC), Ok(()));
    assert_eq!(
      map.validate(&LumpLimits::GOLDSRC.with(LumpType::Edges, Some(3))),
      Err(CorruptionError::LimitExceeded { lump: LumpType::Edges, count: 4, max: 3 })
    );
    map.set_lump(LumpType::Models, Box::new([]));
    assert_eq!(map.validate(&LumpLimits::UNBOUNDED), Err(CorruptionError::MissingLump { lump: LumpType::Models }));
  }

  #[test]
  fn replaced_texture_lump_is_written_back() {
    let mut map = minimal_map();
    let textures = TextureDirectory::new(vec![TextureRecord::external("crate01", 64, 64)]);
    map.replace_textures(&textures);
    let read = BspFile::read(Cursor::new(to_bytes(&map))).unwrap();
    assert_eq!(read.textures().unwrap(), textures);
  }

  #[test]
  fn open_reads_from_disk() {
    let map = minimal_map();
    let file = tempfile::NamedTempFile::new().unwrap();
    map.save(file.path()).unwrap();
    let read = BspFile::open(file.path()).unwrap();
    assert_eq!(read.models().unwrap().len(), 1);
  }
}
