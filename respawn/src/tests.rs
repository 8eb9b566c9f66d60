use crate::{
  checkpoint::{DbAdapter, Relationship, Table},
  database::{DatabaseTy, Executor},
  Error,
};
use alloc::{
  collections::{BTreeMap, BTreeSet},
  format,
  string::{String, ToString},
  vec,
  vec::Vec,
};
use core::fmt::{Display, Formatter};

/// Executor that interprets the statements written by the adapter of an engine against a set of
/// in-memory row counters.
///
/// Deleting a table that is still referenced by a non-empty table fails while the foreign key is
/// enforced, which includes self-references. SQLite only defers checks while a transaction or a
/// savepoint is open.
#[derive(Debug)]
pub(crate) struct InMemoryDb {
  pub(crate) adapter: &'static dyn DbAdapter,
  /// Names of the foreign keys that aren't enforced, see [`constraint_name`].
  pub(crate) disabled: BTreeSet<String>,
  pub(crate) fail_on: Option<String>,
  pub(crate) log: Vec<String>,
  pub(crate) reseeded: Vec<Table>,
  pub(crate) relationships: Vec<Relationship>,
  pub(crate) rows: BTreeMap<Table, u64>,
  pub(crate) session_disabled: bool,
  pub(crate) session_state: String,
  savepoint: Option<BTreeMap<Table, u64>>,
  snapshot: Option<BTreeMap<Table, u64>>,
}

impl InMemoryDb {
  pub(crate) fn new(ty: DatabaseTy) -> Self {
    let session_state = match ty {
      DatabaseTy::Postgres => "origin",
      DatabaseTy::Sqlite => "0",
      _ => "1",
    };
    Self {
      adapter: ty.adapter(),
      disabled: BTreeSet::new(),
      fail_on: None,
      log: Vec::new(),
      reseeded: Vec::new(),
      relationships: Vec::new(),
      rows: BTreeMap::new(),
      session_disabled: false,
      session_state: session_state.into(),
      savepoint: None,
      snapshot: None,
    }
  }

  /// `child` references `parent` through a foreign key that was disabled beforehand.
  pub(crate) fn disabled_relationship(self, parent: (&str, &str), child: (&str, &str)) -> Self {
    let mut this = self.relationship(parent, child);
    if let Some(elem) = this.relationships.last() {
      let _ = this.disabled.insert(constraint_name(elem));
    }
    this
  }

  /// Statements that equal `cmd` fail.
  pub(crate) fn fail_on(
    mut self,
    cmd: impl FnOnce(&dyn DbAdapter, &mut String) -> crate::Result<()>,
  ) -> Self {
    self.fail_on = Some(self.statement(cmd));
    self
  }

  /// `child` references `parent`.
  pub(crate) fn relationship(mut self, parent: (&str, &str), child: (&str, &str)) -> Self {
    self
      .relationships
      .push(Relationship::new(Table::new(parent.0, parent.1), Table::new(child.0, child.1)));
    self
  }

  pub(crate) fn rows(&self, schema: &str, name: &str) -> u64 {
    self.rows.get(&Table::new(schema, name)).copied().unwrap_or_default()
  }

  pub(crate) fn table(mut self, schema: &str, name: &str, rows: u64) -> Self {
    let _ = self.rows.insert(Table::new(schema, name), rows);
    self
  }

  pub(crate) fn total_rows(&self) -> u64 {
    self.rows.values().sum()
  }

  /// Statements that modify data or settings, excluding catalog queries.
  pub(crate) fn writes(&self) -> impl Iterator<Item = &str> {
    let state_query = self.state_query();
    self
      .log
      .iter()
      .map(String::as_str)
      .filter(move |cmd| !cmd.starts_with("SELECT") && *cmd != state_query)
  }

  fn delete(&mut self, table: &Table) -> crate::Result<u64> {
    let is_deferring = self.adapter.ty() == DatabaseTy::Sqlite;
    let is_bypassed = self.session_disabled && (!is_deferring || self.is_transactional());
    if !is_bypassed {
      for relationship in self.relationships.iter().filter(|elem| elem.parent == *table) {
        if self.disabled.contains(&constraint_name(relationship)) {
          continue;
        }
        if self.rows.get(&relationship.child).copied().unwrap_or_default() > 0 {
          let msg = format!("{table} is referenced by {}", relationship.child);
          return Err(Error::executor(InMemoryError(msg)));
        }
      }
    }
    Ok(self.rows.get_mut(table).map(core::mem::take).unwrap_or_default())
  }

  fn is_transactional(&self) -> bool {
    self.snapshot.is_some() || self.savepoint.is_some()
  }

  fn state_query(&self) -> String {
    let mut buffer = String::new();
    let _ = self.adapter.push_constraint_state_query(&mut buffer);
    buffer
  }

  fn statement(&self, cb: impl FnOnce(&dyn DbAdapter, &mut String) -> crate::Result<()>) -> String {
    let mut buffer = String::new();
    let _rslt = cb(self.adapter, &mut buffer);
    buffer
  }
}

impl Executor for InMemoryDb {
  type Record = Vec<Option<String>>;

  fn execute(&mut self, cmd: &str) -> crate::Result<u64> {
    self.log.push(cmd.to_string());
    if self.fail_on.as_deref() == Some(cmd) {
      return Err(Error::executor(InMemoryError(format!("Injected failure: {cmd}"))));
    }
    match cmd {
      "BEGIN" | "BEGIN TRANSACTION" | "START TRANSACTION" => {
        self.snapshot = Some(self.rows.clone());
        return Ok(0);
      }
      "COMMIT" => {
        self.snapshot = None;
        return Ok(0);
      }
      "ROLLBACK" => {
        if let Some(snapshot) = self.snapshot.take() {
          self.rows = snapshot;
        }
        return Ok(0);
      }
      "SAVEPOINT respawn_group" => {
        self.savepoint = Some(self.rows.clone());
        return Ok(0);
      }
      "RELEASE respawn_group" => {
        self.savepoint = None;
        return Ok(0);
      }
      "ROLLBACK TO respawn_group" => {
        if let Some(savepoint) = &self.savepoint {
          self.rows = savepoint.clone();
        }
        return Ok(0);
      }
      _ => {}
    }
    if cmd == self.statement(|adapter, buffer| adapter.push_disable_constraints(buffer, None)) {
      self.session_disabled = true;
      return Ok(0);
    }
    for prior in ["0", "1", "local", "origin", "replica"] {
      let enable =
        self.statement(|adapter, buffer| adapter.push_enable_constraints(buffer, None, Some(prior)));
      if cmd == enable {
        self.session_disabled = false;
        self.session_state = prior.into();
        return Ok(0);
      }
    }
    for relationship in self.relationships.clone() {
      let name = constraint_name(&relationship);
      let target = Some((&relationship.child, name.as_str()));
      if cmd == self.statement(|adapter, buffer| adapter.push_disable_constraints(buffer, target)) {
        let _ = self.disabled.insert(name);
        return Ok(0);
      }
      let enable =
        self.statement(|adapter, buffer| adapter.push_enable_constraints(buffer, target, None));
      if cmd == enable {
        let _ = self.disabled.remove(&name);
        return Ok(0);
      }
    }
    let tables: Vec<Table> = self.rows.keys().cloned().collect();
    for table in &tables {
      if cmd == self.statement(|adapter, buffer| adapter.push_delete(buffer, table)) {
        return self.delete(table);
      }
      let reseed = self.statement(|adapter, buffer| adapter.push_reseed(buffer, table).map(|_| ()));
      if cmd == reseed {
        self.reseeded.push(table.clone());
        return Ok(0);
      }
    }
    Err(Error::executor(InMemoryError(format!("Unknown statement: {cmd}"))))
  }

  fn fetch_many(
    &mut self,
    cmd: &str,
    mut cb: impl FnMut(&Self::Record) -> crate::Result<()>,
  ) -> crate::Result<()> {
    self.log.push(cmd.to_string());
    if self.fail_on.as_deref() == Some(cmd) {
      return Err(Error::executor(InMemoryError(format!("Injected failure: {cmd}"))));
    }
    if !cmd.is_empty() && cmd == self.state_query() {
      return cb(&vec![Some(self.session_state.clone())]);
    }
    for table in self.rows.keys() {
      let query =
        self.statement(|adapter, buffer| adapter.push_active_constraints_query(buffer, table));
      if query.is_empty() || cmd != query {
        continue;
      }
      for relationship in self.relationships.iter().filter(|elem| elem.child == *table) {
        let name = constraint_name(relationship);
        if !self.disabled.contains(&name) {
          cb(&vec![Some(name)])?;
        }
      }
      return Ok(());
    }
    if cmd.contains("AS parent_name") {
      for relationship in &self.relationships {
        if self.disabled.contains(&constraint_name(relationship)) {
          continue;
        }
        cb(&vec![
          Some(relationship.child.schema().into()),
          Some(relationship.child.name().into()),
          Some(relationship.parent.schema().into()),
          Some(relationship.parent.name().into()),
        ])?;
      }
      return Ok(());
    }
    if cmd.contains("AS table_name") {
      for table in self.rows.keys() {
        cb(&vec![Some(table.schema().into()), Some(table.name().into())])?;
      }
      return Ok(());
    }
    Err(Error::executor(InMemoryError(format!("Unknown query: {cmd}"))))
  }
}

/// Name of the foreign key behind `relationship`.
pub(crate) fn constraint_name(relationship: &Relationship) -> String {
  format!("fk_{}_{}", relationship.child.name(), relationship.parent.name())
}

#[derive(Debug)]
pub(crate) struct InMemoryError(pub(crate) String);

impl Display for InMemoryError {
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    f.write_str(&self.0)
  }
}

impl core::error::Error for InMemoryError {}

#[test]
fn deferred_checks_only_hold_inside_a_transaction() {
  let mut db = InMemoryDb::new(DatabaseTy::Sqlite)
    .table("main", "x", 1)
    .table("main", "y", 1)
    .relationship(("main", "x"), ("main", "y"));
  let x = Table::new("main", "x");
  let defer = db.statement(|adapter, buffer| adapter.push_disable_constraints(buffer, None));
  let delete = db.statement(|adapter, buffer| adapter.push_delete(buffer, &x));
  let _ = db.execute(&defer).unwrap();
  assert!(db.execute(&delete).is_err());
  let _ = db.execute("SAVEPOINT respawn_group").unwrap();
  assert_eq!(db.execute(&delete).unwrap(), 1);
  let _ = db.execute("ROLLBACK TO respawn_group").unwrap();
  let _ = db.execute("RELEASE respawn_group").unwrap();
  assert_eq!(db.rows("main", "x"), 1);
}

#[test]
fn executor_scalar_and_entities() {
  let mut db = InMemoryDb::new(DatabaseTy::Mysql).table("a", "foo", 1).table("b", "bar", 1);
  assert_eq!(db.scalar("SELECT @@SESSION.foreign_key_checks").unwrap().as_deref(), Some("1"));
  let mut tables = Vec::new();
  db.simple_entities("SELECT 1 AS table_name", |table: Table| {
    tables.push(table);
    Ok(())
  })
  .unwrap();
  assert_eq!(tables, [Table::new("a", "foo"), Table::new("b", "bar")]);
  assert!(db.execute("TRUNCATE everything").is_err());
}
