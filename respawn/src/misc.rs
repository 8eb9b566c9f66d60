//! Miscellaneous

mod enum_var_strings;
mod sql_writer;

pub use enum_var_strings::EnumVarStrings;
pub use sql_writer::{push_literal, push_quoted, push_separated};

/// Installs a global hierarchical `tracing` subscriber that writes the events of resets to
/// `stderr`.
///
/// Filtering directives are read from `RUST_LOG`. `fallback_opt` is used when the variable is
/// absent or malformed and defaults to the debug events of this crate, which describe discovered
/// tables and resolved plans.
#[cfg(feature = "_tracing-subscriber")]
#[inline]
pub fn tracing_tree_init(fallback_opt: Option<&str>) -> crate::Result<()> {
  use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
  };
  let fallback = fallback_opt.unwrap_or("respawn=debug");
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
  let tracing_tree = tracing_tree::HierarchicalLayer::default()
    .with_indent_amount(2)
    .with_indent_lines(true)
    .with_targets(true)
    .with_verbose_entry(false)
    .with_verbose_exit(false)
    .with_writer(std::io::stderr);
  tracing_subscriber::Registry::default().with(env_filter).with(tracing_tree).try_init()?;
  Ok(())
}

#[cfg(all(feature = "_tracing-subscriber", test))]
mod tests {
  use crate::{
    checkpoint::{Checkpoint, CheckpointConfig},
    database::DatabaseTy,
    misc::tracing_tree_init,
    tests::InMemoryDb,
    Error,
  };

  #[test]
  fn tracing_tree_is_installed_once() {
    tracing_tree_init(Some("respawn=trace")).unwrap();
    assert!(matches!(tracing_tree_init(None), Err(Error::TryInitError(_))));
    let mut db = InMemoryDb::new(DatabaseTy::Sqlite).table("main", "foo", 1);
    let _ = Checkpoint::new(CheckpointConfig::new(DatabaseTy::Sqlite)).unwrap().reset(&mut db).unwrap();
    assert_eq!(db.rows("main", "foo"), 0);
  }
}
