/// Bytes per luxel, lightmaps are stored as plain RGB.
pub const LIGHT_SAMPLE_SIZE: usize = 3;

/// View over the lighting lump. Faces address it by byte offset.
#[derive(Copy, Clone, Debug)]
pub struct Lighting<'a> {
  data: &'a [u8]
}

impl<'a> Lighting<'a> {
  pub fn new(data: &'a [u8]) -> Self {
    Self {
      data
    }
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// The RGB samples of `luxel_count` luxels starting at byte `offset`.
  pub fn samples(&self, offset: usize, luxel_count: usize) -> Option<&'a [u8]> {
    let end = offset.checked_add(luxel_count.checked_mul(LIGHT_SAMPLE_SIZE)?)?;
    self.data.get(offset..end)
  }
}
