use std::io::{Read, Result as IOResult, Write};

use crate::error::{BspError, CorruptionError, FormatError};
use crate::lump::{Lump, LUMP_COUNT};
use crate::{PrimitiveRead, PrimitiveWrite};

/// The only version this crate reads. It doubles as the magic tag of the file.
pub const BSP_VERSION: u32 = 30;

pub const HEADER_SIZE: usize = 4 + LUMP_COUNT * Lump::SIZE;

pub struct MapHeader {
  pub version: u32,
  pub lumps: [Lump; LUMP_COUNT],
}

impl MapHeader {
  /// `file_length` is the size of the whole input, so a short file is reported by what it
  /// is missing instead of as an I/O error.
  pub fn read(reader: &mut dyn Read, file_length: u64) -> Result<MapHeader, BspError> {
    if file_length < 4 {
      let mut magic = [0u8; 4];
      reader.read_exact(&mut magic[..file_length as usize])?;
      return Err(FormatError::BadMagic { expected: BSP_VERSION, found: u32::from_le_bytes(magic) }.into());
    }
    let version = reader.read_u32()?;
    check_magic(version)?;
    if file_length < HEADER_SIZE as u64 {
      return Err(CorruptionError::TruncatedHeader { file_length }.into());
    }

    let mut lumps = [Lump::default(); LUMP_COUNT];
    for lump in &mut lumps {
      *lump = Lump::read(reader)?;
    }
    Ok(MapHeader {
      version,
      lumps,
    })
  }

  pub fn write(&self, writer: &mut dyn Write) -> IOResult<()> {
    writer.write_u32(self.version)?;
    for lump in &self.lumps {
      lump.write(writer)?;
    }
    Ok(())
  }
}

fn check_magic(found: u32) -> Result<(), FormatError> {
  if found == BSP_VERSION {
    Ok(())
  } else if found == BSP_VERSION.swap_bytes() {
    Err(FormatError::WrongEndianness { found })
  } else {
    Err(FormatError::BadMagic { expected: BSP_VERSION, found })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn swapped_magic_is_reported_as_endianness_problem() {
    assert_eq!(check_magic(0x1E00_0000), Err(FormatError::WrongEndianness { found: 0x1E00_0000 }));
    assert_eq!(check_magic(29), Err(FormatError::BadMagic { expected: 30, found: 29 }));
    assert_eq!(check_magic(30), Ok(()));
  }

  #[test]
  fn header_round_trip() {
    let mut header = MapHeader { version: BSP_VERSION, lumps: [Lump::default(); LUMP_COUNT] };
    header.lumps[3] = Lump { file_offset: 124, file_length: 36 };
    let mut bytes = Vec::new();
    header.write(&mut bytes).unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE);

    let read = MapHeader::read(&mut &bytes[..], bytes.len() as u64).unwrap();
    assert_eq!(read.lumps[3], Lump { file_offset: 124, file_length: 36 });
  }

  #[test]
  fn short_input_is_typed() {
    let bytes = [30u8, 0];
    match MapHeader::read(&mut &bytes[..], 2) {
      Err(BspError::Format(FormatError::BadMagic { expected: 30, found: 30 })) => {}
      other => panic!("expected bad magic, got {:?}", other.map(|header| header.version)),
    }

    let mut bytes = BSP_VERSION.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 10]);
    match MapHeader::read(&mut &bytes[..], bytes.len() as u64) {
      Err(BspError::Corruption(CorruptionError::TruncatedHeader { file_length: 14 })) => {}
      other => panic!("expected truncated header, got {:?}", other.map(|header| header.version)),
    }
  }
}
