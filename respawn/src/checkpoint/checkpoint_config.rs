use crate::{
  checkpoint::{CheckpointError, ConfigurationIssue},
  database::DatabaseTy,
};
use alloc::{string::String, vec::Vec};

/// Parameters of a [`crate::checkpoint::Checkpoint`].
///
/// Schema rules and table rules are independent dimensions. In each dimension the include list
/// wins when both lists are provided, which is rejected by [`CheckpointConfig::strict`]
/// configurations.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckpointConfig {
  /// Engine of the target database
  pub database_ty: DatabaseTy,
  /// Schemas that are never emptied. Ignored if `schemas_to_include` is not empty.
  pub schemas_to_exclude: Vec<String>,
  /// If not empty, only tables of these schemas are emptied. System schemas are only visited when
  /// named here.
  pub schemas_to_include: Vec<String>,
  /// Upgrades configuration warnings into [`ConfigurationIssue`] errors.
  pub strict: bool,
  /// Bare table names that are never emptied. Ignored if `tables_to_include` is not empty.
  pub tables_to_ignore: Vec<String>,
  /// If not empty, only tables with these bare names are emptied.
  pub tables_to_include: Vec<String>,
  /// Resets auto-increment counters after deleting.
  pub with_reseed: bool,
  /// Wraps the reset in a transaction when the engine allows it.
  ///
  /// Must be disabled when the connection is already inside a transaction managed by the caller.
  /// Depending on the engine, opening a second transaction either fails or, like MySQL's
  /// `START TRANSACTION`, implicitly commits the pending one.
  pub with_transaction: bool,
}

impl CheckpointConfig {
  /// Default values for a given engine.
  #[inline]
  pub fn new(database_ty: DatabaseTy) -> Self {
    Self {
      database_ty,
      schemas_to_exclude: Vec::new(),
      schemas_to_include: Vec::new(),
      strict: false,
      tables_to_ignore: Vec::new(),
      tables_to_include: Vec::new(),
      with_reseed: false,
      with_transaction: true,
    }
  }

  /// Deserializes a configuration from a JSON document.
  #[cfg(feature = "serde_json")]
  #[inline]
  pub fn from_json(bytes: &[u8]) -> crate::Result<Self> {
    Ok(serde_json::from_slice(bytes)?)
  }

  /// See [`DatabaseTy`].
  #[inline]
  #[must_use]
  pub fn database_ty(mut self, elem: DatabaseTy) -> Self {
    self.database_ty = elem;
    self
  }

  /// Replaces the excluded schemas.
  #[inline]
  #[must_use]
  pub fn schemas_to_exclude<S>(mut self, elem: impl IntoIterator<Item = S>) -> Self
  where
    S: Into<String>,
  {
    self.schemas_to_exclude = elem.into_iter().map(Into::into).collect();
    self
  }

  /// Replaces the included schemas.
  #[inline]
  #[must_use]
  pub fn schemas_to_include<S>(mut self, elem: impl IntoIterator<Item = S>) -> Self
  where
    S: Into<String>,
  {
    self.schemas_to_include = elem.into_iter().map(Into::into).collect();
    self
  }

  /// Strict or permissive validation.
  #[inline]
  #[must_use]
  pub fn strict(mut self, elem: bool) -> Self {
    self.strict = elem;
    self
  }

  /// Replaces the ignored tables.
  #[inline]
  #[must_use]
  pub fn tables_to_ignore<S>(mut self, elem: impl IntoIterator<Item = S>) -> Self
  where
    S: Into<String>,
  {
    self.tables_to_ignore = elem.into_iter().map(Into::into).collect();
    self
  }

  /// Replaces the included tables.
  #[inline]
  #[must_use]
  pub fn tables_to_include<S>(mut self, elem: impl IntoIterator<Item = S>) -> Self
  where
    S: Into<String>,
  {
    self.tables_to_include = elem.into_iter().map(Into::into).collect();
    self
  }

  /// Reseed flag
  #[inline]
  #[must_use]
  pub fn with_reseed(mut self, elem: bool) -> Self {
    self.with_reseed = elem;
    self
  }

  /// Transaction flag, see the `with_transaction` field.
  #[inline]
  #[must_use]
  pub fn with_transaction(mut self, elem: bool) -> Self {
    self.with_transaction = elem;
    self
  }

  /// Blank names are always rejected. Contradictory rules are rejected in strict mode and
  /// reported otherwise.
  #[inline]
  pub fn validate(&self) -> crate::Result<()> {
    let lists = [
      &self.schemas_to_exclude,
      &self.schemas_to_include,
      &self.tables_to_ignore,
      &self.tables_to_include,
    ];
    if lists.iter().any(|list| list.iter().any(|name| name.trim().is_empty())) {
      return Err(CheckpointError::InvalidConfiguration(ConfigurationIssue::EmptyName).into());
    }
    let schemas_contradict = !self.schemas_to_include.is_empty() && !self.schemas_to_exclude.is_empty();
    let tables_contradict = !self.tables_to_include.is_empty() && !self.tables_to_ignore.is_empty();
    if schemas_contradict || tables_contradict {
      if self.strict {
        return Err(
          CheckpointError::InvalidConfiguration(ConfigurationIssue::ContradictoryRules).into(),
        );
      }
      _warn!("Include and exclude rules of the same dimension were provided, exclude rules are ignored");
    }
    Ok(())
  }
}

impl Default for CheckpointConfig {
  #[inline]
  fn default() -> Self {
    Self::new(DatabaseTy::default())
  }
}
