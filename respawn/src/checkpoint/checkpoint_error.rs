use crate::checkpoint::Table;
use alloc::{boxed::Box, vec::Vec};

create_enum! {
  /// Catalog introspection performed before every reset.
  #[derive(Clone, Copy, Debug, Eq, PartialEq)]
  pub enum CatalogQuery<u8> {
    /// Base tables
    Tables = (0, "tables"),
    /// Enforced foreign keys
    Relationships = (1, "relationships"),
  }
}

create_enum! {
  /// Statement kinds issued while a plan is executed.
  #[derive(Clone, Copy, Debug, Eq, PartialEq)]
  pub enum ResetStep<u8> {
    /// Opening or closing the wrapping transaction or the savepoint of a constrained group
    Transaction = (0, "transaction"),
    /// Reading the enforcement state of the session or of a table
    ConstraintState = (1, "constraint-state"),
    /// Suspending constraint enforcement
    DisableConstraints = (2, "disable-constraints"),
    /// Deleting every record of a table
    Delete = (3, "delete"),
    /// Resuming constraint enforcement
    EnableConstraints = (4, "enable-constraints"),
    /// Resetting auto-increment counters
    Reseed = (5, "reseed"),
  }
}

/// Invalid [`crate::checkpoint::CheckpointConfig`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigurationIssue {
  /// A filter list contains a blank name
  EmptyName,
  /// Include and exclude lists of the same dimension were both provided
  ContradictoryRules,
  /// An include list was provided but no table survived the filters
  NoMatchingTables,
}

/// Errors of [`crate::checkpoint::Checkpoint`].
#[derive(Debug)]
pub enum CheckpointError {
  /// Discovery of tables or relationships failed.
  CatalogQueryFailed {
    /// Failed introspection
    catalog: CatalogQuery,
    /// Underlying error
    cause: Box<crate::Error>,
  },
  /// Tables that reference each other can not be emptied because the engine is unable to
  /// suspend foreign-key enforcement. Nothing was deleted.
  UnresolvableCycle {
    /// Sorted members of every cycle
    tables: Vec<Table>,
  },
  /// A statement issued while executing a plan failed.
  ResetFailed {
    /// Zero-based position of the phase in the plan. Equal to the number of phases for steps
    /// that happen after every phase, like committing or reseeding.
    phase: usize,
    /// What was being done
    step: ResetStep,
    /// Table targeted by the statement, if any
    table: Option<Table>,
    /// Underlying error
    cause: Box<crate::Error>,
  },
  /// See [`ConfigurationIssue`].
  InvalidConfiguration(ConfigurationIssue),
}
