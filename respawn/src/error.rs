use crate::{checkpoint::CheckpointError, database::DatabaseError};
use alloc::boxed::Box;
use core::fmt::{Debug, Display, Formatter};

/// Grouped individual errors
#[derive(Debug)]
pub enum Error {
  // External - Misc
  //
  /// Errors of the underlying database driver. See [`crate::database::Executor`].
  ExecutorError(Box<dyn core::error::Error + Send + Sync>),
  #[cfg(feature = "serde_json")]
  /// See [`serde_json::Error`].
  SerdeJson(serde_json::Error),
  #[cfg(feature = "_tracing-subscriber")]
  /// See [`tracing_subscriber::util::TryInitError`].
  TryInitError(tracing_subscriber::util::TryInitError),

  // External - Std
  //
  /// See [`core::fmt::Error`].
  Fmt(core::fmt::Error),

  // Generic
  //
  /// Unexpected String
  UnexpectedString {
    /// Length of the received string
    length: usize,
  },
  /// Unexpected Unsigned integer
  UnexpectedUint {
    /// Received number
    received: u32,
  },

  // Internal
  //
  /// See [`CheckpointError`].
  CheckpointError(CheckpointError),
  /// See [`DatabaseError`].
  DatabaseError(DatabaseError),
}

impl Error {
  /// Boxes an error returned by a database driver.
  #[inline]
  pub fn executor<E>(from: E) -> Self
  where
    E: core::error::Error + Send + Sync + 'static,
  {
    Self::ExecutorError(Box::new(from))
  }
}

impl Display for Error {
  #[inline]
  fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
    <Self as Debug>::fmt(self, f)
  }
}

impl core::error::Error for Error {
  #[inline]
  fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
    match self {
      Self::ExecutorError(elem) => Some(&**elem),
      Self::CheckpointError(
        CheckpointError::CatalogQueryFailed { cause, .. }
        | CheckpointError::ResetFailed { cause, .. },
      ) => Some(&**cause),
      _ => None,
    }
  }
}

impl From<core::fmt::Error> for Error {
  #[inline]
  fn from(from: core::fmt::Error) -> Self {
    Self::Fmt(from)
  }
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for Error {
  #[inline]
  fn from(from: serde_json::Error) -> Self {
    Self::SerdeJson(from)
  }
}

#[cfg(feature = "_tracing-subscriber")]
impl From<tracing_subscriber::util::TryInitError> for Error {
  #[inline]
  fn from(from: tracing_subscriber::util::TryInitError) -> Self {
    Self::TryInitError(from)
  }
}

impl From<CheckpointError> for Error {
  #[inline]
  fn from(from: CheckpointError) -> Self {
    Self::CheckpointError(from)
  }
}

impl From<DatabaseError> for Error {
  #[inline]
  fn from(from: DatabaseError) -> Self {
    Self::DatabaseError(from)
  }
}
