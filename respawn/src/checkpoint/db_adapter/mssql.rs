use crate::{
  checkpoint::{
    db_adapter::{push_system_schemas_filter, ConstraintScope, DbAdapter},
    Collation, Table,
  },
  database::DatabaseTy,
  misc::{push_literal, push_quoted},
};
use alloc::string::String;

/// Microsoft SQL Server and Azure SQL.
///
/// History tables of system-versioned temporal tables are skipped because they can not be
/// modified while versioning is on.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mssql;

impl DbAdapter for Mssql {
  #[inline]
  fn ty(&self) -> DatabaseTy {
    DatabaseTy::Mssql
  }

  #[inline]
  fn collation(&self) -> Collation {
    Collation::CaseInsensitive
  }

  #[inline]
  fn constraint_scope(&self) -> ConstraintScope {
    ConstraintScope::Table
  }

  #[inline]
  fn begin_transaction(&self, _: bool) -> Option<&'static str> {
    Some("BEGIN TRANSACTION")
  }

  #[inline]
  fn system_schemas(&self) -> &'static [&'static str] {
    &["INFORMATION_SCHEMA", "sys"]
  }

  #[inline]
  fn push_identifier(&self, buffer: &mut String, ident: &str) {
    push_quoted(buffer, ('[', ']'), ident);
  }

  #[inline]
  fn push_tables_query(
    &self,
    buffer: &mut String,
    schemas_to_include: &[String],
  ) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        sch.name AS table_schema,
        tbl.name AS table_name
      FROM
        sys.tables tbl
        JOIN sys.schemas sch ON sch.schema_id = tbl.schema_id
      WHERE
        tbl.is_ms_shipped = 0
        AND tbl.temporal_type <> 1",
    );
    push_system_schemas_filter(self, buffer, "sch.name", schemas_to_include)
  }

  #[inline]
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        child_sch.name AS child_schema,
        child.name AS child_name,
        parent_sch.name AS parent_schema,
        parent.name AS parent_name
      FROM
        sys.foreign_keys fk
        JOIN sys.tables child ON child.object_id = fk.parent_object_id
        JOIN sys.schemas child_sch ON child_sch.schema_id = child.schema_id
        JOIN sys.tables parent ON parent.object_id = fk.referenced_object_id
        JOIN sys.schemas parent_sch ON parent_sch.schema_id = parent.schema_id
      WHERE
        fk.is_disabled = 0",
    );
    Ok(())
  }

  #[inline]
  fn push_active_constraints_query(&self, buffer: &mut String, table: &Table) -> crate::Result<()> {
    let mut qualified = String::new();
    self.push_table(&mut qualified, table);
    buffer.push_str(
      "SELECT
        fk.name AS constraint_name
      FROM
        sys.foreign_keys fk
      WHERE
        fk.is_disabled = 0
        AND fk.parent_object_id = OBJECT_ID(N",
    );
    push_literal(buffer, &qualified);
    buffer.push(')');
    Ok(())
  }

  #[inline]
  fn push_disable_constraints(
    &self,
    buffer: &mut String,
    target: Option<(&Table, &str)>,
  ) -> crate::Result<()> {
    if let Some((table, constraint)) = target {
      buffer.push_str("ALTER TABLE ");
      self.push_table(buffer, table);
      buffer.push_str(" NOCHECK CONSTRAINT ");
      self.push_identifier(buffer, constraint);
    }
    Ok(())
  }

  #[inline]
  fn push_enable_constraints(
    &self,
    buffer: &mut String,
    target: Option<(&Table, &str)>,
    _: Option<&str>,
  ) -> crate::Result<()> {
    if let Some((table, constraint)) = target {
      buffer.push_str("ALTER TABLE ");
      self.push_table(buffer, table);
      buffer.push_str(" WITH CHECK CHECK CONSTRAINT ");
      self.push_identifier(buffer, constraint);
    }
    Ok(())
  }

  // Tables that never received a record have a NULL `last_value` and must not be reseeded,
  // otherwise the next identity would skip the seed.
  #[inline]
  fn push_reseed(&self, buffer: &mut String, table: &Table) -> crate::Result<bool> {
    let mut qualified = String::new();
    self.push_table(&mut qualified, table);
    buffer.push_str(
      "DECLARE @reseed BIGINT;
      SELECT
        @reseed = CONVERT(BIGINT, seed_value) - CONVERT(BIGINT, increment_value)
      FROM
        sys.identity_columns
      WHERE
        last_value IS NOT NULL
        AND object_id = OBJECT_ID(N",
    );
    push_literal(buffer, &qualified);
    buffer.push_str(");\n      IF @reseed IS NOT NULL DBCC CHECKIDENT (N");
    push_literal(buffer, &qualified);
    buffer.push_str(", RESEED, @reseed)");
    Ok(true)
  }
}
