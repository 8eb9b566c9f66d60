use crate::database::Record;

/// An element that can be represented from a single database record.
pub trait FromRecord: Sized {
  /// Fallible entry-point that maps the element.
  fn from_record(record: &impl Record) -> crate::Result<Self>;
}

impl FromRecord for () {
  #[inline]
  fn from_record(_: &impl Record) -> crate::Result<Self> {
    Ok(())
  }
}

impl FromRecord for alloc::string::String {
  #[inline]
  fn from_record(record: &impl Record) -> crate::Result<Self> {
    Ok(record.decode(0, "generic_column")?.into())
  }
}
