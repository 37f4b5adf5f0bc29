use std::io::Error as IOError;

use thiserror::Error;

use crate::LumpType;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
  #[error("bad magic: expected version {expected}, found {found:#010x}")]
  BadMagic { expected: u32, found: u32 },
  #[error("file is byte-swapped (found {found:#010x}), it was written with the wrong endianness")]
  WrongEndianness { found: u32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorruptionError {
  #[error("index {index} into lump {lump} is out of range (count {count})")]
  IndexOutOfRange { lump: LumpType, index: i64, count: usize },
  #[error("lump {lump} has length {length} which is not a multiple of its record size {record_size}")]
  LumpSizeMismatch { lump: LumpType, length: usize, record_size: usize },
  #[error("file is {file_length} bytes long, too short for the lump directory")]
  TruncatedHeader { file_length: u64 },
  #[error("lump {lump} at offset {offset} with length {length} ends outside of the file ({file_length} bytes)")]
  LumpOutOfBounds { lump: LumpType, offset: u32, length: u32, file_length: u64 },
  #[error("required lump {lump} is empty")]
  MissingLump { lump: LumpType },
  #[error("lump {lump} holds {count} entries, the limit is {max}")]
  LimitExceeded { lump: LumpType, count: usize, max: usize },
  #[error("face {face} has {count} edges, at least 3 are required")]
  TooFewEdges { face: usize, count: usize },
  #[error("texture {texture} at lump offset {offset} extends past the end of the texture lump")]
  TextureOutOfBounds { texture: usize, offset: usize },
  #[error("texture {texture} has an invalid palette size {size}")]
  InvalidPaletteSize { texture: usize, size: usize },
  #[error("lightmap of face {face} at offset {offset} with length {length} extends past the end of the lighting lump")]
  LightmapOutOfBounds { face: usize, offset: usize, length: usize },
  #[error("visibility data at offset {offset} is truncated")]
  Visibility { offset: usize },
  #[error("node tree loops back on itself at node {node}")]
  CyclicTree { node: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
  #[error("unterminated string starting at byte {offset}")]
  UnterminatedString { offset: usize },
  #[error("expected '{{' at byte {offset}, found {found:?}")]
  ExpectedBlockStart { offset: usize, found: char },
  #[error("unexpected {found:?} at byte {offset}, expected {expected}")]
  UnexpectedCharacter { offset: usize, found: char, expected: &'static str },
  #[error("unexpected end of entity text at byte {offset}")]
  UnexpectedEnd { offset: usize },
}

impl ParseError {
  pub fn offset(&self) -> usize {
    match self {
      ParseError::UnterminatedString { offset }
      | ParseError::ExpectedBlockStart { offset, .. }
      | ParseError::UnexpectedCharacter { offset, .. }
      | ParseError::UnexpectedEnd { offset } => *offset,
    }
  }
}

#[derive(Debug, Error)]
pub enum BspError {
  #[error("I/O error: {0}")]
  IOError(#[from] IOError),
  #[error(transparent)]
  Format(#[from] FormatError),
  #[error(transparent)]
  Corruption(#[from] CorruptionError),
  #[error(transparent)]
  Parse(#[from] ParseError),
}
