/// A single row returned by a catalog query.
///
/// Catalog queries only select textual columns so drivers are expected to hand over the textual
/// representation of each value.
pub trait Record {
  /// Number of columns
  fn len(&self) -> usize;

  /// Textual value of the column at `idx`. `None` means `NULL` or an out-of-bounds index.
  fn value(&self, idx: usize) -> Option<&str>;

  /// If the record has no columns.
  #[inline]
  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Shortcut that transforms `NULL` values into [`crate::database::DatabaseError`].
  #[inline]
  fn decode(&self, idx: usize, name: &'static str) -> crate::Result<&str> {
    match self.value(idx) {
      Some(elem) => Ok(elem),
      None => Err(crate::database::DatabaseError::MissingFieldDataInDecoding(name).into()),
    }
  }
}

impl<T> Record for &T
where
  T: Record,
{
  #[inline]
  fn len(&self) -> usize {
    (**self).len()
  }

  #[inline]
  fn value(&self, idx: usize) -> Option<&str> {
    (**self).value(idx)
  }
}

impl Record for () {
  #[inline]
  fn len(&self) -> usize {
    0
  }

  #[inline]
  fn value(&self, _: usize) -> Option<&str> {
    None
  }
}

impl<S> Record for [Option<S>]
where
  S: AsRef<str>,
{
  #[inline]
  fn len(&self) -> usize {
    <[Option<S>]>::len(self)
  }

  #[inline]
  fn value(&self, idx: usize) -> Option<&str> {
    self.get(idx)?.as_ref().map(AsRef::as_ref)
  }
}

impl<S> Record for alloc::vec::Vec<Option<S>>
where
  S: AsRef<str>,
{
  #[inline]
  fn len(&self) -> usize {
    self.as_slice().len()
  }

  #[inline]
  fn value(&self, idx: usize) -> Option<&str> {
    <[Option<S>] as Record>::value(self.as_slice(), idx)
  }
}
