use std::io::{Result as IOResult, Write};

pub trait PrimitiveWrite {
  fn write_u16(&mut self, value: u16) -> IOResult<()>;
  fn write_u32(&mut self, value: u32) -> IOResult<()>;
  fn write_i16(&mut self, value: i16) -> IOResult<()>;
  fn write_i32(&mut self, value: i32) -> IOResult<()>;
  fn write_f32(&mut self, value: f32) -> IOResult<()>;
  /// Writes `value` into a field of exactly `length` bytes, truncating or NUL padding as needed.
  fn write_fixed_length_string(&mut self, value: &str, length: usize) -> IOResult<()>;
}

impl<T: Write + ?Sized> PrimitiveWrite for T {
  fn write_u16(&mut self, value: u16) -> IOResult<()> {
    self.write_all(&value.to_le_bytes())
  }

  fn write_u32(&mut self, value: u32) -> IOResult<()> {
    self.write_all(&value.to_le_bytes())
  }

  fn write_i16(&mut self, value: i16) -> IOResult<()> {
    self.write_all(&value.to_le_bytes())
  }

  fn write_i32(&mut self, value: i32) -> IOResult<()> {
    self.write_all(&value.to_le_bytes())
  }

  fn write_f32(&mut self, value: f32) -> IOResult<()> {
    self.write_all(&value.to_le_bytes())
  }

  fn write_fixed_length_string(&mut self, value: &str, length: usize) -> IOResult<()> {
    let mut buffer = vec![0u8; length];
    let bytes = value.as_bytes();
    let len = bytes.len().min(length);
    buffer[..len].copy_from_slice(&bytes[..len]);
    self.write_all(&buffer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{PrimitiveRead, StringRead};

  #[test]
  fn written_values_read_back() {
    let mut bytes = Vec::new();
    bytes.write_u16(256).unwrap();
    bytes.write_i32(-7).unwrap();
    bytes.write_fixed_length_string("aaatrigger", 16).unwrap();
    assert_eq!(bytes.len(), 22);
    assert_eq!(&bytes[..2], &[0x00, 0x01]);

    let mut reader = &bytes[..];
    assert_eq!(reader.read_u16().unwrap(), 256);
    assert_eq!(reader.read_i32().unwrap(), -7);
    assert_eq!(reader.read_fixed_length_null_terminated_string(16).unwrap(), "aaatrigger");
  }
}
