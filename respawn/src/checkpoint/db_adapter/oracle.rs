use crate::{
  checkpoint::{
    db_adapter::{push_system_schemas_filter, ConstraintScope, DbAdapter},
    Collation, Table,
  },
  database::DatabaseTy,
  misc::{push_literal, push_quoted},
};
use alloc::string::String;

/// Oracle. Schemas are the users that own the tables.
///
/// `ALTER TABLE` implicitly commits so resets are never transactional. Schemas without circular
/// references issue nothing but `DELETE`s, which stay uncommitted unless the connection is in
/// autocommit mode or the caller commits afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct Oracle;

impl DbAdapter for Oracle {
  #[inline]
  fn ty(&self) -> DatabaseTy {
    DatabaseTy::Oracle
  }

  #[inline]
  fn collation(&self) -> Collation {
    Collation::CaseSensitive
  }

  #[inline]
  fn constraint_scope(&self) -> ConstraintScope {
    ConstraintScope::Table
  }

  #[inline]
  fn begin_transaction(&self, _: bool) -> Option<&'static str> {
    None
  }

  #[inline]
  fn system_schemas(&self) -> &'static [&'static str] {
    &[
      "ANONYMOUS",
      "APEX_PUBLIC_USER",
      "APPQOSSYS",
      "AUDSYS",
      "CTXSYS",
      "DBSFWUSER",
      "DBSNMP",
      "DIP",
      "DVSYS",
      "GSMADMIN_INTERNAL",
      "LBACSYS",
      "MDSYS",
      "OJVMSYS",
      "OLAPSYS",
      "ORDDATA",
      "ORDSYS",
      "OUTLN",
      "SYS",
      "SYSTEM",
      "WMSYS",
      "XDB",
    ]
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
        tbl.owner AS table_schema,
        tbl.table_name AS table_name
      FROM
        all_tables tbl
      WHERE
        tbl.temporary = 'N'
        AND tbl.dropped = 'NO'
        AND tbl.nested = 'NO'
        AND tbl.secondary = 'N'",
    );
    push_system_schemas_filter(self, buffer, "tbl.owner", schemas_to_include)
  }

  #[inline]
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        child.owner AS child_schema,
        child.table_name AS child_name,
        parent.owner AS parent_schema,
        parent.table_name AS parent_name
      FROM
        all_constraints child
        JOIN all_constraints parent
          ON parent.owner = child.r_owner AND parent.constraint_name = child.r_constraint_name
      WHERE
        child.constraint_type = 'R'
        AND child.status = 'ENABLED'",
    );
    Ok(())
  }

  #[inline]
  fn push_active_constraints_query(&self, buffer: &mut String, table: &Table) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        con.constraint_name AS constraint_name
      FROM
        all_constraints con
      WHERE
        con.constraint_type = 'R'
        AND con.status = 'ENABLED'
        AND con.owner = ",
    );
    push_literal(buffer, table.schema());
    buffer.push_str(" AND con.table_name = ");
    push_literal(buffer, table.name());
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
      buffer.push_str(" DISABLE CONSTRAINT ");
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
      buffer.push_str(" ENABLE CONSTRAINT ");
      self.push_identifier(buffer, constraint);
    }
    Ok(())
  }
}
