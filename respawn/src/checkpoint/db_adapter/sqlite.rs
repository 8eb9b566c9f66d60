use crate::{
  checkpoint::{
    db_adapter::{ConstraintScope, DbAdapter, Enclosure},
    Collation, Table,
  },
  database::DatabaseTy,
  misc::push_quoted,
};
use alloc::string::String;

/// SQLite. Only the `main` database is inspected.
///
/// Circular references are emptied with deferred foreign keys, which are only checked when the
/// outermost transaction commits. Resets that aren't transactional surround each circular group
/// with a savepoint, which also nests inside transactions managed by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sqlite;

impl DbAdapter for Sqlite {
  #[inline]
  fn ty(&self) -> DatabaseTy {
    DatabaseTy::Sqlite
  }

  #[inline]
  fn collation(&self) -> Collation {
    Collation::CaseInsensitive
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
  fn group_enclosure(&self) -> Option<Enclosure> {
    Some(Enclosure {
      open: "SAVEPOINT respawn_group",
      close: "RELEASE respawn_group",
      undo: &["ROLLBACK TO respawn_group", "RELEASE respawn_group"],
    })
  }

  #[inline]
  fn system_schemas(&self) -> &'static [&'static str] {
    &[]
  }

  #[inline]
  fn push_identifier(&self, buffer: &mut String, ident: &str) {
    push_quoted(buffer, ('"', '"'), ident);
  }

  #[inline]
  fn push_tables_query(&self, buffer: &mut String, _: &[String]) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        'main' AS table_schema,
        tbl.name AS table_name
      FROM
        sqlite_master tbl
      WHERE
        tbl.type = 'table'
        AND tbl.name NOT LIKE 'sqlite_%'",
    );
    Ok(())
  }

  #[inline]
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        'main' AS child_schema,
        tbl.name AS child_name,
        'main' AS parent_schema,
        fk.\"table\" AS parent_name
      FROM
        sqlite_master tbl
        JOIN pragma_foreign_key_list(tbl.name) fk
      WHERE
        tbl.type = 'table'",
    );
    Ok(())
  }

  #[inline]
  fn push_constraint_state_query(&self, buffer: &mut String) -> crate::Result<bool> {
    buffer.push_str("PRAGMA defer_foreign_keys");
    Ok(true)
  }

  #[inline]
  fn push_disable_constraints(
    &self,
    buffer: &mut String,
    _: Option<(&Table, &str)>,
  ) -> crate::Result<()> {
    buffer.push_str("PRAGMA defer_foreign_keys = ON");
    Ok(())
  }

  #[inline]
  fn push_enable_constraints(
    &self,
    buffer: &mut String,
    _: Option<(&Table, &str)>,
    prior: Option<&str>,
  ) -> crate::Result<()> {
    let value = match prior {
      Some("1") => "ON",
      _ => "OFF",
    };
    buffer.push_str("PRAGMA defer_foreign_keys = ");
    buffer.push_str(value);
    Ok(())
  }
}
