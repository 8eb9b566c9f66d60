//! Everything that differs between database engines.
//!
//! Adapters never talk to the database. They only write the statements that
//! [`crate::checkpoint::Checkpoint`] sends through an [`crate::database::Executor`], which keeps
//! every dialect testable without a live connection.
//!
//! Catalog queries of every adapter return the same column layout:
//!
//! * Tables: `schema`, `name`.
//! * Relationships: `child_schema`, `child_name`, `parent_schema`, `parent_name`.
//! * Active constraints: `constraint_name`.

mod ansi;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sqlite;

use crate::{
  checkpoint::{Collation, Table},
  database::DatabaseTy,
  misc::{push_literal, push_separated},
};
use alloc::string::String;
pub use ansi::Ansi;
use core::fmt::Debug;
pub use mssql::Mssql;
pub use mysql::Mysql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

/// How foreign-key enforcement can be suspended to empty tables that reference each other.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstraintScope {
  /// Enforcement can not be suspended. Circular schemas can not be reset.
  Unsupported,
  /// Enforcement is switched off and on for the whole session. The previous state is read before
  /// the switch so that it can be restored afterwards.
  Session,
  /// Enforcement is switched off and on for each enforced foreign key of the involved tables.
  /// Foreign keys that were already disabled before a reset are left untouched.
  Table,
}

impl ConstraintScope {
  /// If constrained groups can be deleted.
  #[inline]
  pub fn is_supported(self) -> bool {
    !matches!(self, Self::Unsupported)
  }
}

/// Statements that surround a sequence of statements issued by a reset.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Enclosure {
  /// Issued before the first statement
  pub open: &'static str,
  /// Issued after the last statement succeeded
  pub close: &'static str,
  /// Issued, in order, instead of `close` when a statement failed
  pub undo: &'static [&'static str],
}

impl Enclosure {
  /// Transaction opened by `begin` and finished by `COMMIT` or `ROLLBACK`.
  #[inline]
  pub const fn transaction(begin: &'static str) -> Self {
    Self { open: begin, close: "COMMIT", undo: &["ROLLBACK"] }
  }
}

/// Dialect-specific catalog queries and statement templates.
pub trait DbAdapter: Debug + Send + Sync {
  /// See [`DatabaseTy`].
  fn ty(&self) -> DatabaseTy;

  /// How identifiers returned by the catalog are compared.
  fn collation(&self) -> Collation;

  /// See [`ConstraintScope`].
  fn constraint_scope(&self) -> ConstraintScope;

  /// Statement that opens a transaction wrapping the whole reset. `None` if the engine commits
  /// implicitly in the middle of the statements issued by a reset.
  fn begin_transaction(&self, with_reseed: bool) -> Option<&'static str>;

  /// Surrounds each constrained group of a reset that isn't enclosed in a transaction. Only
  /// needed by engines whose suspension lasts until the end of the current transaction.
  #[inline]
  fn group_enclosure(&self) -> Option<Enclosure> {
    None
  }

  /// Schemas that are never reset unless explicitly included.
  fn system_schemas(&self) -> &'static [&'static str];

  /// Writes a delimited identifier.
  fn push_identifier(&self, buffer: &mut String, ident: &str);

  /// Writes the catalog query that lists base tables. See the module documentation for the
  /// column layout.
  fn push_tables_query(
    &self,
    buffer: &mut String,
    schemas_to_include: &[String],
  ) -> crate::Result<()>;

  /// Writes the catalog query that lists enforced foreign keys. See the module documentation for
  /// the column layout.
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()>;

  /// Writes a query listing the enforced foreign keys declared by `table`. See the module
  /// documentation for the column layout. Only used by [`ConstraintScope::Table`].
  #[inline]
  fn push_active_constraints_query(&self, _buffer: &mut String, _table: &Table) -> crate::Result<()> {
    Ok(())
  }

  /// Writes a statement that suspends foreign-key enforcement. `target` is a table and the name of
  /// one of its foreign keys for [`ConstraintScope::Table`] and `None` for
  /// [`ConstraintScope::Session`].
  #[inline]
  fn push_disable_constraints(
    &self,
    _buffer: &mut String,
    _target: Option<(&Table, &str)>,
  ) -> crate::Result<()> {
    Ok(())
  }

  /// Writes a statement that resumes foreign-key enforcement of `target`, see
  /// [`DbAdapter::push_disable_constraints`]. `prior` is the value returned by the query of
  /// [`DbAdapter::push_constraint_state_query`], if any.
  #[inline]
  fn push_enable_constraints(
    &self,
    _buffer: &mut String,
    _target: Option<(&Table, &str)>,
    _prior: Option<&str>,
  ) -> crate::Result<()> {
    Ok(())
  }

  /// Writes a scalar query returning the current session-wide enforcement state. Returns `false`
  /// if nothing was written.
  #[inline]
  fn push_constraint_state_query(&self, _buffer: &mut String) -> crate::Result<bool> {
    Ok(false)
  }

  /// Writes an unconditional deletion of every record of `table`.
  #[inline]
  fn push_delete(&self, buffer: &mut String, table: &Table) -> crate::Result<()> {
    buffer.push_str("DELETE FROM ");
    self.push_table(buffer, table);
    Ok(())
  }

  /// Writes a statement that resets the auto-increment counters of `table`. Returns `false` if
  /// the engine has no such statement.
  #[inline]
  fn push_reseed(&self, _buffer: &mut String, _table: &Table) -> crate::Result<bool> {
    Ok(false)
  }

  /// Writes the schema-qualified delimited name of `table`.
  #[inline]
  fn push_table(&self, buffer: &mut String, table: &Table) {
    self.push_identifier(buffer, table.schema());
    buffer.push('.');
    self.push_identifier(buffer, table.name());
  }
}

/// Writes ` AND {column} NOT IN (...)` with every system schema of `adapter` that isn't present
/// in `schemas_to_include`. Writes nothing if no schema remains.
pub(crate) fn push_system_schemas_filter(
  adapter: &dyn DbAdapter,
  buffer: &mut String,
  column: &str,
  schemas_to_include: &[String],
) -> crate::Result<()> {
  let collation = adapter.collation();
  let mut iter = adapter
    .system_schemas()
    .iter()
    .copied()
    .filter(|schema| !collation.contains(schemas_to_include, schema))
    .peekable();
  if iter.peek().is_none() {
    return Ok(());
  }
  buffer.push_str(" AND ");
  buffer.push_str(column);
  buffer.push_str(" NOT IN (");
  push_separated(buffer, iter, ", ", |local, schema| {
    push_literal(local, schema);
    Ok(())
  })?;
  buffer.push(')');
  Ok(())
}
