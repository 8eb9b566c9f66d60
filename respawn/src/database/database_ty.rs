use crate::checkpoint::{
  db_adapter::{Ansi, Mssql, Mysql, Oracle, Postgres, Sqlite},
  DbAdapter,
};

create_enum! {
  /// Database engines with a dedicated [`DbAdapter`].
  #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
  #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
  #[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
  pub enum DatabaseTy<u8> {
    /// Any engine exposing the standard `information_schema` views
    Ansi = (0, "ansi"),
    /// MS-SQL
    Mssql = (1, "mssql"),
    /// MySql
    Mysql = (2, "mysql"),
    /// Oracle
    Oracle = (3, "oracle"),
    /// PostgreSQL
    #[default]
    Postgres = (4, "postgres"),
    /// SQLite
    Sqlite = (5, "sqlite")
  }
}

impl DatabaseTy {
  /// The stateless adapter that speaks the dialect of this engine.
  #[inline]
  pub fn adapter(self) -> &'static dyn DbAdapter {
    match self {
      Self::Ansi => &Ansi,
      Self::Mssql => &Mssql,
      Self::Mysql => &Mysql,
      Self::Oracle => &Oracle,
      Self::Postgres => &Postgres,
      Self::Sqlite => &Sqlite,
    }
  }
}
