//! Persistence layer for items, containers and the actors that own them.
//!
//! Records are versioned. A transaction remembers the version of every
//! record it read and hands the repository one [`ChangeSet`] at commit; the
//! repository applies it atomically or rejects it with a conflict.

mod error;
mod history;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use history::{TransactionLogEvent, TransactionType};
pub use memory::InMemoryRepository;
pub use traits::{ChangeSet, RecordKey, Repository, Versioned};
