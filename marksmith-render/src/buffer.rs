//! Growable text buffer used to pass Markdown and HTML across the render
//! boundary.
use crate::error::{RenderError, RenderResult};

/// Default growth unit for output buffers.
pub const BUFFER_UNIT: usize = 128;

/// A growable UTF-8 buffer whose allocation failures are observable.
///
/// Growth goes through [`Vec::try_reserve`] semantics, so an allocator
/// refusal becomes a [`RenderError::Allocation`] instead of an abort. An
/// optional byte limit caps the buffer and fails the same way when exceeded.
#[derive(Debug)]
pub struct RenderBuffer {
  data:  String,
  limit: Option<usize>,
}

impl RenderBuffer {
  /// Allocate an empty buffer with room for `unit` bytes.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Allocation`] if the memory cannot be reserved or
  /// `unit` exceeds `limit`.
  #[track_caller]
  pub fn with_capacity(unit: usize, limit: Option<usize>) -> RenderResult<Self> {
    let mut buffer = Self {
      data: String::new(),
      limit,
    };
    buffer.grow(unit)?;
    Ok(buffer)
  }

  /// Allocate a buffer holding a copy of `text`.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Allocation`] if the copy cannot be stored.
  #[track_caller]
  pub fn from_text(text: &str, limit: Option<usize>) -> RenderResult<Self> {
    let mut buffer = Self::with_capacity(text.len(), limit)?;
    buffer.put(text)?;
    Ok(buffer)
  }

  /// Make sure the buffer can hold at least `size` bytes in total.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Allocation`] if the reservation fails or `size`
  /// exceeds the buffer limit.
  #[track_caller]
  pub fn grow(&mut self, size: usize) -> RenderResult<()> {
    if self.limit.is_some_and(|limit| size > limit) {
      return Err(RenderError::allocation(size));
    }
    let additional = size.saturating_sub(self.data.len());
    self
      .data
      .try_reserve(additional)
      .map_err(|_| RenderError::allocation(size))
  }

  /// Append `text`, growing as needed.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Allocation`] if the buffer cannot grow.
  #[track_caller]
  pub fn put(&mut self, text: &str) -> RenderResult<()> {
    let needed = self
      .data
      .len()
      .checked_add(text.len())
      .ok_or_else(|| RenderError::allocation(usize::MAX))?;
    self.grow(needed)?;
    self.data.push_str(text);
    Ok(())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.data
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.data.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Release the buffer, handing its contents to the caller.
  #[must_use]
  pub fn into_string(self) -> String {
    self.data
  }
}
