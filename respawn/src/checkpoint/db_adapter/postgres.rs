use crate::{
  checkpoint::{
    db_adapter::{push_system_schemas_filter, ConstraintScope, DbAdapter},
    Collation, Table,
  },
  database::DatabaseTy,
  misc::{push_literal, push_quoted},
};
use alloc::string::String;

/// PostgreSQL
///
/// Circular references are handled by switching `session_replication_role` to `replica`, which
/// stops the internal triggers that enforce foreign keys for the current session without touching
/// the state of any table. Changing the setting requires a superuser or, since PostgreSQL 15, a
/// role granted `SET` on it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Postgres;

impl DbAdapter for Postgres {
  #[inline]
  fn ty(&self) -> DatabaseTy {
    DatabaseTy::Postgres
  }

  #[inline]
  fn collation(&self) -> Collation {
    Collation::CaseSensitive
  }

  #[inline]
  fn constraint_scope(&self) -> ConstraintScope {
    ConstraintScope::Session
  }

  #[inline]
  fn begin_transaction(&self, _: bool) -> Option<&'static str> {
    Some("BEGIN")
  }

  #[inline]
  fn system_schemas(&self) -> &'static [&'static str] {
    &["information_schema", "pg_catalog"]
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
        ns.nspname AS table_schema,
        cl.relname AS table_name
      FROM
        pg_catalog.pg_class cl
        JOIN pg_catalog.pg_namespace ns ON ns.oid = cl.relnamespace
        -- that don't depend on an extension
        LEFT JOIN pg_catalog.pg_depend dep ON dep.objid = cl.oid AND dep.deptype = 'e'
      WHERE
        -- regular or partitioned tables
        cl.relkind IN ('r', 'p')
        -- partitions are emptied through their parents
        AND NOT cl.relispartition
        AND cl.relpersistence <> 't'
        AND dep.objid IS NULL
        AND ns.nspname NOT LIKE 'pg_toast%'
        AND ns.nspname NOT LIKE 'pg_temp_%'",
    );
    push_system_schemas_filter(self, buffer, "ns.nspname", schemas_to_include)
  }

  #[inline]
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        child_ns.nspname AS child_schema,
        child.relname AS child_name,
        parent_ns.nspname AS parent_schema,
        parent.relname AS parent_name
      FROM
        pg_catalog.pg_constraint con
        JOIN pg_catalog.pg_class child ON child.oid = con.conrelid
        JOIN pg_catalog.pg_namespace child_ns ON child_ns.oid = child.relnamespace
        JOIN pg_catalog.pg_class parent ON parent.oid = con.confrelid
        JOIN pg_catalog.pg_namespace parent_ns ON parent_ns.oid = parent.relnamespace
      WHERE
        con.contype = 'f'",
    );
    Ok(())
  }

  #[inline]
  fn push_constraint_state_query(&self, buffer: &mut String) -> crate::Result<bool> {
    buffer.push_str("SELECT current_setting('session_replication_role')");
    Ok(true)
  }

  #[inline]
  fn push_disable_constraints(
    &self,
    buffer: &mut String,
    _: Option<(&Table, &str)>,
  ) -> crate::Result<()> {
    buffer.push_str("SET session_replication_role = replica");
    Ok(())
  }

  #[inline]
  fn push_enable_constraints(
    &self,
    buffer: &mut String,
    _: Option<(&Table, &str)>,
    prior: Option<&str>,
  ) -> crate::Result<()> {
    buffer.push_str("SET session_replication_role = ");
    match prior {
      Some(elem) => push_literal(buffer, elem),
      None => buffer.push_str("DEFAULT"),
    }
    Ok(())
  }

  #[inline]
  fn push_reseed(&self, buffer: &mut String, table: &Table) -> crate::Result<bool> {
    let mut qualified = String::new();
    self.push_table(&mut qualified, table);
    buffer.push_str(
      "DO $respawn$
      DECLARE
        seq regclass;
      BEGIN
        FOR seq IN
          SELECT
            dep.objid::regclass
          FROM
            pg_catalog.pg_depend dep
            JOIN pg_catalog.pg_class cl ON cl.oid = dep.objid
          WHERE
            cl.relkind = 'S'
            AND dep.deptype IN ('a', 'i')
            AND dep.refobjid = ",
    );
    push_literal(buffer, &qualified);
    buffer.push_str(
      "::regclass
        LOOP
          EXECUTE format('ALTER SEQUENCE %s RESTART', seq);
        END LOOP;
      END
      $respawn$",
    );
    Ok(true)
  }
}
