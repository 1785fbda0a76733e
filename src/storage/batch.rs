//! Atomic multi-document batches
//!
//! Soft delete and restore each touch two collections for the same id: the
//! document must appear in one and vanish from the other as a single unit.
//! A [`Batch`] collects the operations; the storage commits it through a
//! roll-forward journal so an interrupted commit is completed on the next
//! open instead of leaving a ticket in both sets or in neither.

use crate::core::{Ticket, TicketId, TrashedTicket};
use serde::{Deserialize, Serialize};

/// One operation inside a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchOp {
    /// Write a document into the trash set
    PutTrashed(TrashedTicket),
    /// Remove a document from the active set
    RemoveTicket(TicketId),
    /// Write a document into the active set
    PutTicket(Ticket),
    /// Remove a document from the trash set
    RemoveTrashed(TicketId),
}

/// An ordered set of document writes applied all-or-nothing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    /// Create an empty batch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the batch contains no operations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of operations in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Queue a write into the trash set
    pub fn put_trashed(&mut self, trashed: TrashedTicket) {
        self.ops.push(BatchOp::PutTrashed(trashed));
    }

    /// Queue a removal from the active set
    pub fn remove_ticket(&mut self, id: TicketId) {
        self.ops.push(BatchOp::RemoveTicket(id));
    }

    /// Queue a write into the active set
    pub fn put_ticket(&mut self, ticket: Ticket) {
        self.ops.push(BatchOp::PutTicket(ticket));
    }

    /// Queue a removal from the trash set
    pub fn remove_trashed(&mut self, id: TicketId) {
        self.ops.push(BatchOp::RemoveTrashed(id));
    }

    /// The queued operations, in order
    #[must_use]
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }
}

/// Commit side of the batch API
///
/// Implementations must apply the whole batch or none of it from the point of
/// view of any later reader, even across a crash mid-commit.
pub trait BatchCommit {
    /// Apply all operations in the batch as one atomic unit
    fn commit_batch(&self, batch: Batch) -> crate::error::Result<()>;
}
