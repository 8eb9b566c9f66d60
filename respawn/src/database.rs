//! Boundary between the reset engine and the database driver that owns the connection.

mod database_error;
mod database_ty;
mod executor;
mod from_record;
mod record;

pub use database_error::DatabaseError;
pub use database_ty::DatabaseTy;
pub use executor::Executor;
pub use from_record::FromRecord;
pub use record::Record;

