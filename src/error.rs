use thiserror::Error;

use crate::types::GameId;

/// Result type alias for sort operations.
pub type Result<T> = std::result::Result<T, SortError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// Two records share a game id. Unique ids are the precondition that
    /// makes every sort deterministic (id is the final tie-break), so
    /// this is fatal rather than silently tolerated.
    #[error("duplicate game id {0} in record collection")]
    DuplicateGameId(GameId),
}
