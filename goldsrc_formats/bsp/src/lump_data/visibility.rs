use crate::error::CorruptionError;

/// Run-length compressed potentially visible sets, addressed by `Leaf::visibility_offset`.
#[derive(Copy, Clone, Debug)]
pub struct Visibility<'a> {
  data: &'a [u8]
}

impl<'a> Visibility<'a> {
  pub fn new(data: &'a [u8]) -> Self {
    Self {
      data
    }
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Expands the row starting at `offset` into one bit per visible leaf.
  /// `leaf_count` is the number of visible leaves of the world model; leaf 0 is the shared
  /// solid leaf and has no bit, so bit `n` describes leaf `n + 1`.
  pub fn decompress(&self, offset: usize, leaf_count: usize) -> Result<Box<[u8]>, CorruptionError> {
    let row_length = (leaf_count + 7) / 8;
    let mut row = Vec::with_capacity(row_length);
    let mut position = offset;
    while row.len() < row_length {
      let value = *self.data.get(position).ok_or(CorruptionError::Visibility { offset: position })?;
      position += 1;
      if value != 0 {
        row.push(value);
        continue;
      }

      // A zero byte is followed by the number of zero bytes it stands for.
      let run = *self.data.get(position).ok_or(CorruptionError::Visibility { offset: position })?;
      position += 1;
      let run = (run as usize).min(row_length - row.len());
      row.resize(row.len() + run, 0u8);
    }
    Ok(row.into_boxed_slice())
  }

  pub fn is_leaf_visible(row: &[u8], leaf: usize) -> bool {
    if leaf == 0 {
      return false;
    }
    let bit = leaf - 1;
    row.get(bit / 8).is_some_and(|byte| byte & (1 << (bit % 8)) != 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_runs_expand() {
    let data = [0xff, 0xff, 0x00, 0x03, 0x81, 0x00];
    let visibility = Visibility::new(&data);
    let row = visibility.decompress(1, 40).unwrap();
    assert_eq!(&*row, &[0xff, 0, 0, 0, 0x81]);
    assert!(Visibility::is_leaf_visible(&row, 1));
    assert!(!Visibility::is_leaf_visible(&row, 9));
    assert!(Visibility::is_leaf_visible(&row, 40));
    assert!(!Visibility::is_leaf_visible(&row, 0));
  }

  #[test]
  fn truncated_row_is_an_error() {
    let data = [0x00];
    let visibility = Visibility::new(&data);
    assert_eq!(visibility.decompress(0, 16), Err(CorruptionError::Visibility { offset: 1 }));
  }
}
