//! Document storage: active set, trash set, user profiles, atomic batches

mod batch;
mod file;
mod repository;

pub use batch::{Batch, BatchCommit, BatchOp};
pub use file::FileStorage;
pub use repository::{ProfileRepository, Repository, TicketRepository, TrashRepository};
