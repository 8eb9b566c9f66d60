use crate::checkpoint::Table;

/// How an engine compares identifiers by default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Collation {
  /// `Foo` and `foo` are the same identifier
  CaseInsensitive,
  /// `Foo` and `foo` are different identifiers
  CaseSensitive,
}

impl Collation {
  /// If `lhs` and `rhs` name the same identifier.
  #[inline]
  pub fn equivalent(self, lhs: &str, rhs: &str) -> bool {
    match self {
      Self::CaseInsensitive => {
        lhs.chars().flat_map(char::to_lowercase).eq(rhs.chars().flat_map(char::to_lowercase))
      }
      Self::CaseSensitive => lhs == rhs,
    }
  }

  /// If `elem` is equal to any element of `slice`.
  #[inline]
  pub fn contains<S>(self, slice: &[S], elem: &str) -> bool
  where
    S: AsRef<str>,
  {
    slice.iter().any(|local| self.equivalent(local.as_ref(), elem))
  }

  /// A representation of `table` where two equivalent tables are also structurally equal.
  #[inline]
  pub fn key(self, table: &Table) -> Table {
    match self {
      Self::CaseInsensitive => Table::new(table.schema().to_lowercase(), table.name().to_lowercase()),
      Self::CaseSensitive => table.clone(),
    }
  }
}
