use crate::{
  checkpoint::{
    db_adapter::{push_system_schemas_filter, ConstraintScope, DbAdapter},
    Collation, Table,
  },
  database::DatabaseTy,
  misc::push_quoted,
};
use alloc::string::String;

/// MySQL and MariaDB. Schemas are databases.
///
/// `ALTER TABLE` commits the current transaction so resets that reseed counters are not
/// transactional.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mysql;

impl DbAdapter for Mysql {
  #[inline]
  fn ty(&self) -> DatabaseTy {
    DatabaseTy::Mysql
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
  fn begin_transaction(&self, with_reseed: bool) -> Option<&'static str> {
    if with_reseed {
      None
    } else {
      Some("START TRANSACTION")
    }
  }

  #[inline]
  fn system_schemas(&self) -> &'static [&'static str] {
    &["information_schema", "mysql", "performance_schema", "sys"]
  }

  #[inline]
  fn push_identifier(&self, buffer: &mut String, ident: &str) {
    push_quoted(buffer, ('`', '`'), ident);
  }

  // https://github.com/flyway/flyway/blob/master/flyway-core/src/main/java/org/flywaydb/core/internal/database/mysql/MySQLSchema.java
  #[inline]
  fn push_tables_query(
    &self,
    buffer: &mut String,
    schemas_to_include: &[String],
  ) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        all_tables.table_schema AS table_schema,
        all_tables.table_name AS table_name
      FROM
        information_schema.tables AS all_tables
      WHERE
        all_tables.table_type IN ('BASE TABLE', 'SYSTEM VERSIONED')",
    );
    push_system_schemas_filter(self, buffer, "all_tables.table_schema", schemas_to_include)
  }

  #[inline]
  fn push_relationships_query(&self, buffer: &mut String) -> crate::Result<()> {
    buffer.push_str(
      "SELECT
        rc.constraint_schema AS child_schema,
        rc.table_name AS child_name,
        rc.unique_constraint_schema AS parent_schema,
        rc.referenced_table_name AS parent_name
      FROM
        information_schema.referential_constraints AS rc",
    );
    Ok(())
  }

  #[inline]
  fn push_constraint_state_query(&self, buffer: &mut String) -> crate::Result<bool> {
    buffer.push_str("SELECT @@SESSION.foreign_key_checks");
    Ok(true)
  }

  #[inline]
  fn push_disable_constraints(
    &self,
    buffer: &mut String,
    _: Option<(&Table, &str)>,
  ) -> crate::Result<()> {
    buffer.push_str("SET FOREIGN_KEY_CHECKS = 0");
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
      Some("0") => "0",
      _ => "1",
    };
    buffer.push_str("SET FOREIGN_KEY_CHECKS = ");
    buffer.push_str(value);
    Ok(())
  }

  #[inline]
  fn push_reseed(&self, buffer: &mut String, table: &Table) -> crate::Result<bool> {
    buffer.push_str("ALTER TABLE ");
    self.push_table(buffer, table);
    buffer.push_str(" AUTO_INCREMENT = 1");
    Ok(true)
  }
}
