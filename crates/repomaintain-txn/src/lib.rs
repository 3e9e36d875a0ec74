//! File-level transactions: back up a set of files, mutate them, then either
//! commit (delete the backups) or roll back (restore every original).
//!
//! Rollback is symmetric and best-effort: a failure to restore one file never
//! prevents the remaining files from being restored. A transaction that is
//! dropped without an explicit outcome rolls back, so error propagation and
//! panics both leave the working tree in its pre-transaction state.

mod copy;
mod error;
mod transaction;

pub use error::{RestoreFailure, TxnError};
pub use transaction::FileTransaction;
