use crate::checkpoint::{CheckpointConfig, Collation, Table};
use alloc::{string::String, vec::Vec};

/// Narrows the tables returned by the catalog to the ones that should be emptied.
///
/// Schemas and tables are two independent dimensions. In each dimension a non-empty include
/// list takes precedence and the corresponding exclude list is ignored. Table rules match bare
/// names in every schema.
#[derive(Debug)]
pub struct ObjectFilter<'cfg> {
  collation: Collation,
  schemas_to_exclude: &'cfg [String],
  schemas_to_include: &'cfg [String],
  tables_to_ignore: &'cfg [String],
  tables_to_include: &'cfg [String],
}

impl<'cfg> ObjectFilter<'cfg> {
  /// New instance
  #[inline]
  pub fn new(config: &'cfg CheckpointConfig, collation: Collation) -> Self {
    Self {
      collation,
      schemas_to_exclude: &config.schemas_to_exclude,
      schemas_to_include: &config.schemas_to_include,
      tables_to_ignore: &config.tables_to_ignore,
      tables_to_include: &config.tables_to_include,
    }
  }

  /// Keeps the tables that pass both dimensions, sorted by schema and name, without duplicates.
  #[inline]
  pub fn resolve(&self, tables: impl IntoIterator<Item = Table>) -> Vec<Table> {
    let mut rslt: Vec<Table> = tables.into_iter().filter(|table| self.should_include(table)).collect();
    rslt.sort_unstable();
    rslt.dedup();
    rslt
  }

  /// If `table` passes both the schema and the table rules.
  #[inline]
  pub fn should_include(&self, table: &Table) -> bool {
    self.should_include_schema(table.schema()) && self.should_include_table_name(table.name())
  }

  /// Schema dimension
  #[inline]
  pub fn should_include_schema(&self, schema: &str) -> bool {
    Self::dimension(self.collation, self.schemas_to_include, self.schemas_to_exclude, schema)
  }

  /// Table dimension
  #[inline]
  pub fn should_include_table_name(&self, name: &str) -> bool {
    Self::dimension(self.collation, self.tables_to_include, self.tables_to_ignore, name)
  }

  fn dimension(collation: Collation, include: &[String], exclude: &[String], elem: &str) -> bool {
    if !include.is_empty() {
      collation.contains(include, elem)
    } else if !exclude.is_empty() {
      !collation.contains(exclude, elem)
    } else {
      true
    }
  }
}

/// Shortcut for [`ObjectFilter::resolve`].
#[inline]
pub fn resolve(
  tables: impl IntoIterator<Item = Table>,
  config: &CheckpointConfig,
  collation: Collation,
) -> Vec<Table> {
  ObjectFilter::new(config, collation).resolve(tables)
}
