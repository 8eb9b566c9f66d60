use crate::database::{FromRecord, Record};
use alloc::string::String;
use core::fmt::{Display, Formatter};

/// A base table identified by its schema and name.
///
/// Ordering is byte-wise by schema and then by name, which is the tie-breaker used by every
/// deterministic step of a reset.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Table {
  schema: String,
  name: String,
}

impl Table {
  /// New instance
  #[inline]
  pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
    Self { schema: schema.into(), name: name.into() }
  }

  /// Table name without the schema
  #[inline]
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Schema, database or owner, depending on how the engine namespaces tables.
  #[inline]
  pub fn schema(&self) -> &str {
    &self.schema
  }
}

impl Display for Table {
  #[inline]
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}.{}", self.schema, self.name)
  }
}

impl FromRecord for Table {
  #[inline]
  fn from_record(record: &impl Record) -> crate::Result<Self> {
    Ok(Self::new(record.decode(0, "table_schema")?, record.decode(1, "table_name")?))
  }
}

/// Foreign key declared by `child` that references `parent`. `child` must be emptied before
/// `parent`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Relationship {
  /// Table that holds the foreign key
  pub child: Table,
  /// Referenced table
  pub parent: Table,
}

impl Relationship {
  /// New instance
  #[inline]
  pub fn new(parent: Table, child: Table) -> Self {
    Self { child, parent }
  }

  /// If a table references itself.
  #[inline]
  pub fn is_self_referencing(&self) -> bool {
    self.child == self.parent
  }
}

impl FromRecord for Relationship {
  #[inline]
  fn from_record(record: &impl Record) -> crate::Result<Self> {
    Ok(Self {
      child: Table::new(record.decode(0, "child_schema")?, record.decode(1, "child_name")?),
      parent: Table::new(record.decode(2, "parent_schema")?, record.decode(3, "parent_name")?),
    })
  }
}
