use crate::{
  checkpoint::{
    db_adapter::{push_system_schemas_filter, ConstraintScope, DbAdapter},
    Collation,
  },
  database::DatabaseTy,
  misc::push_quoted,
};
use alloc::string::String;

/// Engines that only expose the standard `information_schema` views.
///
/// Foreign-key enforcement can not be suspended in a portable way so schemas with circular
/// references are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ansi;

impl DbAdapter for Ansi {
  #[inline]
  fn ty(&self) -> DatabaseTy {
    DatabaseTy::Ansi
  }

  #[inline]
  fn collation(&self) -> Collation {
    Collation::CaseSensitive
  }

  #[inline]
  fn constraint_scope(&self) -> ConstraintScope {
    ConstraintScope::Unsupported
  }

  #[inline]
  fn begin_transaction(&self, _: bool) -> Option<&'static str> {
    Some("START TRANSACTION")
  }

  #[inline]
  fn system_schemas(&self) -> &'static [&'static str] {
    &["INFORMATION_SCHEMA", "information_schema"]
  }

  #[inline]
  fn push_identifier(&self, buffer: &mut String, ident: &str) {
    push_quoted(buffer, ('"', '"'), ident);
  }

  #[inline]
  fn push_tables_query(
    &self,
    buffer: &mut String,
    schemas_to_include: &[String],
  ) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        tables.table_schema AS table_schema,
        tables.table_name AS table_name
      FROM
        information_schema.tables tables
      WHERE
        tables.table_type = 'BASE TABLE'",
    );
    push_system_schemas_filter(self, buffer, "tables.table_schema", schemas_to_include)
  }

  #[inline]
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        fk.table_schema AS child_schema,
        fk.table_name AS child_name,
        pk.table_schema AS parent_schema,
        pk.table_name AS parent_name
      FROM
        information_schema.referential_constraints rc
        JOIN information_schema.table_constraints fk
          ON fk.constraint_schema = rc.constraint_schema AND fk.constraint_name = rc.constraint_name
        JOIN information_schema.table_constraints pk
          ON pk.constraint_schema = rc.unique_constraint_schema
          AND pk.constraint_name = rc.unique_constraint_name",
    );
    Ok(())
  }
}
