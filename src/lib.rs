//! Ranking engine for a chess GUI's game list.
//!
//! A click on a column header lands in [`SortEngine::on_column_clicked`],
//! which maintains a stack of sort keys (most recent click on top, older
//! clicks as tie-breaks) and reorders the list. Most columns sort
//! lexicographically over that stack; the Moves column instead ranks
//! games by branch popularity, ply by ply, so the most played lines in
//! the list surface first. Sorts report completion estimates through a
//! caller-supplied [`ProgressSink`].
//!
//! The engine never owns the records: it borrows them per call and hands
//! back a permutation plus the row to re-focus.

pub mod compare;
mod criteria;
mod decoder;
mod engine;
mod error;
mod log;
mod movecol;
mod progress;
mod types;

pub use criteria::{SortKey, SortSpecification};
pub use decoder::{
    MoveDecoder, MoveToken, RawByteDecoder, SanMovetextDecoder, TranspositionClass,
    TranspositionClassifier,
};
pub use engine::{SortEngine, SortOutcome};
pub use error::{Result, SortError};
pub use progress::{NullSink, ProgressEstimator, ProgressSink};
pub use types::{GameId, GameRecord, GameResult, SortColumn};
