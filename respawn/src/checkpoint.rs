//! Empties the tables of a database in an order that never violates a foreign key.
//!
//! ```rust
//! use respawn::{
//!   checkpoint::{Checkpoint, CheckpointConfig},
//!   database::DatabaseTy,
//! };
//!
//! fn reset_between_tests() -> respawn::Result<()> {
//!   let config = CheckpointConfig::new(DatabaseTy::Postgres).tables_to_ignore(["_migrations"]);
//!   let checkpoint = Checkpoint::new(config)?;
//!   // Any connection implementing `Executor`
//!   let _plan = checkpoint.reset(&mut ())?;
//!   Ok(())
//! }
//! # reset_between_tests().unwrap();
//! ```

mod checkpoint_config;
mod checkpoint_error;
mod collation;
pub mod db_adapter;
mod deletion_plan;
mod dependency_graph;
mod object_filter;
mod table;

use crate::{
  database::{Executor, FromRecord},
  Error,
};
use alloc::{boxed::Box, string::String, vec::Vec};
pub use checkpoint_config::CheckpointConfig;
pub use checkpoint_error::{CatalogQuery, CheckpointError, ConfigurationIssue, ResetStep};
pub use collation::Collation;
pub use db_adapter::{ConstraintScope, DbAdapter, Enclosure};
pub use deletion_plan::{DeletionPlan, Phase};
pub use dependency_graph::DependencyGraph;
pub use object_filter::{resolve, ObjectFilter};
pub use table::{Relationship, Table};

/// Validated configuration bound to the [`DbAdapter`] of its engine.
///
/// Nothing is cached between calls, every reset introspects the catalog again.
#[derive(Debug)]
pub struct Checkpoint {
  adapter: &'static dyn DbAdapter,
  config: CheckpointConfig,
}

impl Checkpoint {
  /// Validates `config` and resolves the adapter of [`CheckpointConfig::database_ty`].
  #[inline]
  pub fn new(config: CheckpointConfig) -> crate::Result<Self> {
    config.validate()?;
    let adapter = config.database_ty.adapter();
    Ok(Self { adapter, config })
  }

  /// See [`DbAdapter`].
  #[inline]
  pub fn adapter(&self) -> &'static dyn DbAdapter {
    self.adapter
  }

  /// See [`CheckpointConfig`].
  #[inline]
  pub fn config(&self) -> &CheckpointConfig {
    &self.config
  }

  /// Discovers and orders the tables that would be emptied without modifying anything.
  #[inline]
  pub fn plan<E>(&self, executor: &mut E) -> crate::Result<DeletionPlan>
  where
    E: Executor,
  {
    let mut buffer = String::new();
    self.plan_with_buffer(&mut buffer, executor)
  }

  /// Empties every table selected by the configuration and returns the executed plan.
  ///
  /// Each statement is issued individually. If a transaction is used, a failure rolls back every
  /// preceding deletion. Otherwise tables emptied before the failure stay empty. Suspended
  /// constraints are always resumed.
  #[inline]
  pub fn reset<E>(&self, executor: &mut E) -> crate::Result<DeletionPlan>
  where
    E: Executor,
  {
    let mut buffer = String::new();
    let plan = self.plan_with_buffer(&mut buffer, executor)?;
    _debug!(
      "Resetting {} table(s) in {} phase(s) of a {} database",
      plan.tables().count(),
      plan.len(),
      self.config.database_ty
    );
    let begin = if self.config.with_transaction {
      self.adapter.begin_transaction(self.config.with_reseed)
    } else {
      None
    };
    match begin {
      Some(elem) => {
        self.enclose(executor, (0, plan.len()), Enclosure::transaction(elem), |local| {
          self.execute_plan(&mut buffer, local, &plan, true)
        })?;
      }
      None => self.execute_plan(&mut buffer, executor, &plan, false)?,
    }
    Ok(plan)
  }

  // Names of the foreign keys of `table` that are currently enforced.
  fn active_constraints<E>(
    &self,
    buffer: &mut String,
    executor: &mut E,
    idx: usize,
    table: &Table,
  ) -> crate::Result<Vec<String>>
  where
    E: Executor,
  {
    let wrap = |err: Error| reset_failed(idx, ResetStep::ConstraintState, Some(table), err);
    buffer.clear();
    self.adapter.push_active_constraints_query(buffer, table).map_err(wrap)?;
    let mut rslt = Vec::new();
    if buffer.is_empty() {
      return Ok(rslt);
    }
    executor
      .simple_entities(buffer, |constraint: String| {
        rslt.push(constraint);
        Ok(())
      })
      .map_err(wrap)?;
    Ok(rslt)
  }

  fn catalog<E, T>(
    &self,
    buffer: &mut String,
    catalog: CatalogQuery,
    executor: &mut E,
    push: impl FnOnce(&dyn DbAdapter, &mut String) -> crate::Result<()>,
  ) -> crate::Result<Vec<T>>
  where
    E: Executor,
    T: FromRecord,
  {
    let wrap = |err: Error| -> Error {
      CheckpointError::CatalogQueryFailed { catalog, cause: Box::new(err) }.into()
    };
    buffer.clear();
    push(self.adapter, buffer).map_err(wrap)?;
    let mut rslt = Vec::new();
    executor
      .simple_entities(buffer, |elem| {
        rslt.push(elem);
        Ok(())
      })
      .map_err(wrap)?;
    _trace!("Catalog returned {} {catalog}", rslt.len());
    Ok(rslt)
  }

  // Issues the opening statement of `enclosure`, calls `fun` and then issues the closing
  // statement. The undoing statements are issued instead if `fun` fails, in which case the error
  // of `fun` is returned.
  fn enclose<E>(
    &self,
    executor: &mut E,
    (open_phase, close_phase): (usize, usize),
    enclosure: Enclosure,
    fun: impl FnOnce(&mut E) -> crate::Result<()>,
  ) -> crate::Result<()>
  where
    E: Executor,
  {
    _trace!("Phase {open_phase}, {}: {}", ResetStep::Transaction, enclosure.open);
    let _ = executor
      .execute(enclosure.open)
      .map_err(|err| reset_failed(open_phase, ResetStep::Transaction, None, err))?;
    match fun(executor) {
      Ok(()) => {
        _trace!("Phase {close_phase}, {}: {}", ResetStep::Transaction, enclosure.close);
        let _ = executor
          .execute(enclosure.close)
          .map_err(|err| reset_failed(close_phase, ResetStep::Transaction, None, err))?;
        Ok(())
      }
      Err(err) => {
        for cmd in enclosure.undo {
          if let Err(_undo_err) = executor.execute(cmd) {
            _warn!("Unable to undo reset with `{cmd}`: {_undo_err}");
            break;
          }
        }
        Err(err)
      }
    }
  }

  fn execute_plan<E>(
    &self,
    buffer: &mut String,
    executor: &mut E,
    plan: &DeletionPlan,
    is_transactional: bool,
  ) -> crate::Result<()>
  where
    E: Executor,
  {
    for (idx, phase) in plan.phases().iter().enumerate() {
      match phase {
        Phase::Ordered(table) => {
          self.issue(buffer, executor, (idx, ResetStep::Delete, Some(table)), |adapter, local| {
            adapter.push_delete(local, table)
          })?;
        }
        Phase::ConstrainedGroup(tables) => match self.adapter.constraint_scope() {
          ConstraintScope::Session => {
            match self.adapter.group_enclosure().filter(|_| !is_transactional) {
              Some(enclosure) => self.enclose(executor, (idx, idx), enclosure, |local| {
                self.session_group(buffer, local, idx, tables)
              })?,
              None => self.session_group(buffer, executor, idx, tables)?,
            }
          }
          ConstraintScope::Table => self.table_group(buffer, executor, idx, tables)?,
          ConstraintScope::Unsupported => {
            return Err(CheckpointError::UnresolvableCycle { tables: tables.clone() }.into());
          }
        },
      }
    }
    if self.config.with_reseed {
      for table in plan.tables() {
        self.issue(buffer, executor, (plan.len(), ResetStep::Reseed, Some(table)), |adapter, local| {
          let _ = adapter.push_reseed(local, table)?;
          Ok(())
        })?;
      }
    }
    Ok(())
  }

  // Writes a statement and executes it if something was written.
  fn issue<E>(
    &self,
    buffer: &mut String,
    executor: &mut E,
    (phase, step, table): (usize, ResetStep, Option<&Table>),
    push: impl FnOnce(&dyn DbAdapter, &mut String) -> crate::Result<()>,
  ) -> crate::Result<()>
  where
    E: Executor,
  {
    buffer.clear();
    push(self.adapter, buffer).map_err(|err| reset_failed(phase, step, table, err))?;
    if buffer.is_empty() {
      return Ok(());
    }
    _trace!("Phase {phase}, {step}: {buffer}");
    let _ = executor.execute(buffer).map_err(|err| reset_failed(phase, step, table, err))?;
    Ok(())
  }

  fn plan_with_buffer<E>(&self, buffer: &mut String, executor: &mut E) -> crate::Result<DeletionPlan>
  where
    E: Executor,
  {
    let collation = self.adapter.collation();
    let tables: Vec<Table> = self.catalog(buffer, CatalogQuery::Tables, executor, |adapter, local| {
      adapter.push_tables_query(local, &self.config.schemas_to_include)
    })?;
    let _tables_len = tables.len();
    let filtered = ObjectFilter::new(&self.config, collation).resolve(tables);
    _debug!("{} of {_tables_len} table(s) passed the filters", filtered.len());
    let has_include_rules =
      !self.config.schemas_to_include.is_empty() || !self.config.tables_to_include.is_empty();
    if filtered.is_empty() && has_include_rules {
      if self.config.strict {
        return Err(
          CheckpointError::InvalidConfiguration(ConfigurationIssue::NoMatchingTables).into(),
        );
      }
      _warn!("No table matched the include rules");
    }
    let relationships: Vec<Relationship> =
      self.catalog(buffer, CatalogQuery::Relationships, executor, |adapter, local| {
        adapter.push_relationships_query(local)
      })?;
    let graph = DependencyGraph::new(filtered, relationships, collation);
    DeletionPlan::new(&graph, self.adapter.constraint_scope())
  }

  // Enforcement is suspended for the whole session. The previous state is restored even if a
  // deletion fails.
  fn session_group<E>(
    &self,
    buffer: &mut String,
    executor: &mut E,
    idx: usize,
    tables: &[Table],
  ) -> crate::Result<()>
  where
    E: Executor,
  {
    buffer.clear();
    let has_state_query = self
      .adapter
      .push_constraint_state_query(buffer)
      .map_err(|err| reset_failed(idx, ResetStep::ConstraintState, None, err))?;
    let prior = if has_state_query {
      executor
        .scalar(buffer)
        .map_err(|err| reset_failed(idx, ResetStep::ConstraintState, None, err))?
    } else {
      None
    };
    let rslt = self
      .issue(buffer, executor, (idx, ResetStep::DisableConstraints, None), |adapter, local| {
        adapter.push_disable_constraints(local, None)
      })
      .and_then(|()| {
        for table in tables {
          self.issue(buffer, executor, (idx, ResetStep::Delete, Some(table)), |adapter, local| {
            adapter.push_delete(local, table)
          })?;
        }
        Ok(())
      });
    let restore_rslt =
      self.issue(buffer, executor, (idx, ResetStep::EnableConstraints, None), |adapter, local| {
        adapter.push_enable_constraints(local, None, prior.as_deref())
      });
    merge(rslt, restore_rslt)
  }

  // Enforcement is suspended foreign key by foreign key. Only the foreign keys that were enforced
  // beforehand are disabled and every one of them is enabled again even if a deletion fails.
  fn table_group<E>(
    &self,
    buffer: &mut String,
    executor: &mut E,
    idx: usize,
    tables: &[Table],
  ) -> crate::Result<()>
  where
    E: Executor,
  {
    let mut disabled: Vec<(&Table, String)> = Vec::new();
    let mut rslt = Ok(());
    'tables: for table in tables {
      let constraints = match self.active_constraints(buffer, executor, idx, table) {
        Ok(elem) => elem,
        Err(err) => {
          rslt = Err(err);
          break;
        }
      };
      for constraint in constraints {
        rslt = self.issue(
          buffer,
          executor,
          (idx, ResetStep::DisableConstraints, Some(table)),
          |adapter, local| {
            adapter.push_disable_constraints(local, Some((table, constraint.as_str())))
          },
        );
        if rslt.is_err() {
          break 'tables;
        }
        disabled.push((table, constraint));
      }
    }
    if rslt.is_ok() {
      for table in tables {
        rslt = self.issue(buffer, executor, (idx, ResetStep::Delete, Some(table)), |adapter, local| {
          adapter.push_delete(local, table)
        });
        if rslt.is_err() {
          break;
        }
      }
    }
    for &(table, ref constraint) in &disabled {
      let restore_rslt = self.issue(
        buffer,
        executor,
        (idx, ResetStep::EnableConstraints, Some(table)),
        |adapter, local| {
          adapter.push_enable_constraints(local, Some((table, constraint.as_str())), None)
        },
      );
      rslt = merge(rslt, restore_rslt);
    }
    rslt
  }
}

// The first error wins. Subsequent errors are only reported.
fn merge(first: crate::Result<()>, second: crate::Result<()>) -> crate::Result<()> {
  match (first, second) {
    (Err(err), Err(_second_err)) => {
      _warn!("Unable to resume constraint enforcement: {_second_err}");
      Err(err)
    }
    (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
    (Ok(()), Ok(())) => Ok(()),
  }
}

fn reset_failed(phase: usize, step: ResetStep, table: Option<&Table>, cause: Error) -> Error {
  CheckpointError::ResetFailed { phase, step, table: table.cloned(), cause: Box::new(cause) }.into()
}
