use std::io::{Read, Result as IOResult};

pub trait StringRead {
  /// Reads exactly `length` bytes and cuts the string at the first NUL.
  /// Bytes that are not valid UTF-8 are replaced, map tools happily write Latin-1 names.
  fn read_fixed_length_null_terminated_string(&mut self, length: u32) -> IOResult<String>;
}

impl<T: Read + ?Sized> StringRead for T {
  fn read_fixed_length_null_terminated_string(&mut self, length: u32) -> IOResult<String> {
    let buffer = self.read_data_exact(length as usize)?;
    let end = buffer.iter().position(|c| *c == 0).unwrap_or(buffer.len());
    Ok(String::from_utf8_lossy(&buffer[..end]).into_owned())
  }
}

pub trait RawDataRead {
  fn read_data_exact(&mut self, len: usize) -> IOResult<Box<[u8]>>;
}

impl<T: Read + ?Sized> RawDataRead for T {
  fn read_data_exact(&mut self, len: usize) -> IOResult<Box<[u8]>> {
    let mut buffer = vec![0u8; len];
    self.read_exact(&mut buffer)?;
    Ok(buffer.into_boxed_slice())
  }
}

pub trait PrimitiveRead {
  fn read_u8(&mut self) -> IOResult<u8>;
  fn read_u16(&mut self) -> IOResult<u16>;
  fn read_u32(&mut self) -> IOResult<u32>;
  fn read_i16(&mut self) -> IOResult<i16>;
  fn read_i32(&mut self) -> IOResult<i32>;
  fn read_f32(&mut self) -> IOResult<f32>;
}

impl<T: Read + ?Sized> PrimitiveRead for T {
  fn read_u8(&mut self) -> IOResult<u8> {
    let mut buffer = [0u8; 1];
    self.read_exact(&mut buffer)?;
    Ok(u8::from_le_bytes(buffer))
  }

  fn read_u16(&mut self) -> IOResult<u16> {
    let mut buffer = [0u8; 2];
    self.read_exact(&mut buffer)?;
    Ok(u16::from_le_bytes(buffer))
  }

  fn read_u32(&mut self) -> IOResult<u32> {
    let mut buffer = [0u8; 4];
    self.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
  }

  fn read_i16(&mut self) -> IOResult<i16> {
    let mut buffer = [0u8; 2];
    self.read_exact(&mut buffer)?;
    Ok(i16::from_le_bytes(buffer))
  }

  fn read_i32(&mut self) -> IOResult<i32> {
    let mut buffer = [0u8; 4];
    self.read_exact(&mut buffer)?;
    Ok(i32::from_le_bytes(buffer))
  }

  fn read_f32(&mut self) -> IOResult<f32> {
    let mut buffer = [0u8; 4];
    self.read_exact(&mut buffer)?;
    Ok(f32::from_le_bytes(buffer))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_little_endian_primitives() {
    let bytes = [0x1e, 0, 0, 0, 0xff, 0xff, 0x00, 0x00, 0x80, 0x3f];
    let mut reader = &bytes[..];
    assert_eq!(reader.read_u32().unwrap(), 30);
    assert_eq!(reader.read_i16().unwrap(), -1);
    assert_eq!(reader.read_f32().unwrap(), 1.0);
    assert!(reader.read_u8().is_err());
  }

  #[test]
  fn fixed_length_string_stops_at_nul() {
    let mut bytes = [0u8; 16];
    bytes[..5].copy_from_slice(b"+0btn");
    bytes[7] = b'x';
    let mut reader = &bytes[..];
    assert_eq!(reader.read_fixed_length_null_terminated_string(16).unwrap(), "+0btn");
    assert!(reader.is_empty());
  }

  #[test]
  fn short_input_is_an_error() {
    let bytes = [1u8, 2, 3];
    let mut reader = &bytes[..];
    assert!(reader.read_data_exact(8).is_err());
  }
}
