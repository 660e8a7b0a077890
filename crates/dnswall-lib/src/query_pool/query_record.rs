use std::net::SocketAddr;

use super::QueryId;

/// State of a query that was forwarded upstream and hasn't been answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRecord {
    id: QueryId,
    /// Transaction id the client originally put into its query
    pub original_id: u16,
    /// Where the answer has to be relayed back to
    pub source_addr: Option<SocketAddr>,
}

impl QueryRecord {
    pub(super) fn new(id: QueryId) -> Self {
        QueryRecord {
            id,
            original_id: 0,
            source_addr: None,
        }
    }

    /// Randomized id that identifies this record inside of its pool.
    /// This is the id that should be sent upstream in place of `original_id`.
    pub fn id(&self) -> QueryId {
        self.id
    }
}
