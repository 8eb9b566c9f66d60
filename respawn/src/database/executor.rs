use crate::database::{FromRecord, Record};

/// A connection for executing database commands.
///
/// Implementations wrap an already-open, externally managed connection. Every method is blocking
/// and must run on the same session so that session-scoped settings and transactions are
/// observed by subsequent calls.
pub trait Executor {
  /// See [Record].
  type Record: Record;

  /// Executes a **single** statement that returns no records, returning the number of affected
  /// records.
  ///
  /// Commands are not cached or inspected for potential vulnerabilities.
  fn execute(&mut self, cmd: &str) -> crate::Result<u64>;

  /// Executes a **single** statement and calls `cb` for each returned record.
  fn fetch_many(
    &mut self,
    cmd: &str,
    cb: impl FnMut(&Self::Record) -> crate::Result<()>,
  ) -> crate::Result<()>;

  /// Retrieves the first column of the first record, if any.
  #[inline]
  fn scalar(&mut self, cmd: &str) -> crate::Result<Option<alloc::string::String>> {
    let mut rslt = None;
    self.fetch_many(cmd, |record| {
      if rslt.is_none() {
        rslt = record.value(0).map(Into::into);
      }
      Ok(())
    })?;
    Ok(rslt)
  }

  /// Retrieves a set of records and maps them to the corresponding `T`. See [`FromRecord`].
  #[inline]
  fn simple_entities<T>(
    &mut self,
    cmd: &str,
    mut cb: impl FnMut(T) -> crate::Result<()>,
  ) -> crate::Result<()>
  where
    T: FromRecord,
  {
    self.fetch_many(cmd, |record| cb(T::from_record(record)?))
  }
}

impl<T> Executor for &mut T
where
  T: Executor,
{
  type Record = T::Record;

  #[inline]
  fn execute(&mut self, cmd: &str) -> crate::Result<u64> {
    (**self).execute(cmd)
  }

  #[inline]
  fn fetch_many(
    &mut self,
    cmd: &str,
    cb: impl FnMut(&Self::Record) -> crate::Result<()>,
  ) -> crate::Result<()> {
    (**self).fetch_many(cmd, cb)
  }
}

impl Executor for () {
  type Record = ();

  #[inline]
  fn execute(&mut self, _: &str) -> crate::Result<u64> {
    Ok(0)
  }

  #[inline]
  fn fetch_many(
    &mut self,
    _: &str,
    _: impl FnMut(&Self::Record) -> crate::Result<()>,
  ) -> crate::Result<()> {
    Ok(())
  }
}
