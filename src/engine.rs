use std::collections::HashSet;

use crate::compare::compare;
use crate::criteria::SortSpecification;
use crate::decoder::{MoveDecoder, RawByteDecoder, TranspositionClassifier};
use crate::error::{Result, SortError};
use crate::log;
use crate::movecol::sort_by_move_frequency;
use crate::progress::{ProgressEstimator, ProgressSink};
use crate::types::{GameId, GameRecord, SortColumn};

/// What one sort call hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOutcome {
    /// Permutation of input indices: `new_order[0]` is the record shown
    /// at the top of the list.
    pub new_order: Vec<usize>,
    /// Index in `new_order` of the record that was focused before the
    /// call (0 when nothing was focused or the record is gone).
    pub focus_index: usize,
    /// A progress sink asked to cancel at some point. Advisory: the sort
    /// still ran to completion and the caller may keep or discard it.
    pub cancelled: bool,
}

/// Orchestrates game-list sorting for one list. Owns the sort history
/// (the key stack) and the adaptive progress factor; callers must
/// serialize invocations per engine, there is no internal locking.
///
/// The engine borrows `records` only for the duration of each call and
/// returns a permutation; record content is never touched. Between calls
/// the caller is expected to display records in the returned order and
/// pass them back in that order (the Id-click direction forcing and
/// fragment detection both read the current visible order).
pub struct SortEngine {
    spec: SortSpecification,
    estimator: ProgressEstimator,
    decoder: Box<dyn MoveDecoder>,
    classifier: Option<Box<dyn TranspositionClassifier>>,
}

impl Default for SortEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SortEngine {
    pub fn new() -> Self {
        Self::with_decoder(Box::new(RawByteDecoder))
    }

    pub fn with_decoder(decoder: Box<dyn MoveDecoder>) -> Self {
        Self {
            spec: SortSpecification::new(),
            estimator: ProgressEstimator::new(),
            decoder,
            classifier: None,
        }
    }

    /// Install or remove transposition grouping for the Moves column.
    pub fn set_classifier(&mut self, classifier: Option<Box<dyn TranspositionClassifier>>) {
        self.classifier = classifier;
    }

    /// The current key stack (primary key first).
    pub fn specification(&self) -> &SortSpecification {
        &self.spec
    }

    /// Handle a click on a column header: update the key stack, then
    /// re-sort. `records` must be in the currently displayed order;
    /// `focus_index` is the currently focused row, if any.
    ///
    /// Lists of one record or fewer are returned as-is with 100%
    /// progress and the key stack untouched.
    pub fn on_column_clicked(
        &mut self,
        column: SortColumn,
        records: &[GameRecord],
        focus_index: Option<usize>,
        sink: &mut dyn ProgressSink,
    ) -> Result<SortOutcome> {
        if records.len() <= 1 {
            sink.report(100);
            return Ok(SortOutcome {
                new_order: (0..records.len()).collect(),
                focus_index: 0,
                cancelled: false,
            });
        }
        validate_unique_ids(records)?;
        self.spec.toggle_column(column, records);
        self.run_sort(records, focus_index, sink)
    }

    /// Re-sort under the current key stack without registering a click.
    /// Useful after the record collection changed externally; also the
    /// idempotent counterpart of `on_column_clicked`.
    pub fn resort(
        &mut self,
        records: &[GameRecord],
        focus_index: Option<usize>,
        sink: &mut dyn ProgressSink,
    ) -> Result<SortOutcome> {
        if records.len() <= 1 {
            sink.report(100);
            return Ok(SortOutcome {
                new_order: (0..records.len()).collect(),
                focus_index: 0,
                cancelled: false,
            });
        }
        validate_unique_ids(records)?;
        self.run_sort(records, focus_index, sink)
    }

    fn run_sort(
        &mut self,
        records: &[GameRecord],
        focus_index: Option<usize>,
        sink: &mut dyn ProgressSink,
    ) -> Result<SortOutcome> {
        let focused_id: Option<GameId> = focus_index
            .and_then(|i| records.get(i))
            .map(|r| r.id);

        self.estimator.clear_cancel();
        let new_order = if self.spec.contains(SortColumn::Moves) {
            sort_by_move_frequency(
                records,
                &self.spec,
                self.decoder.as_ref(),
                self.classifier.as_deref(),
                &mut self.estimator,
                sink,
            )
        } else {
            let Self {
                spec, estimator, ..
            } = self;
            let mut order: Vec<usize> = (0..records.len()).collect();
            estimator.begin(records.len(), 0, 100);
            order.sort_by(|&a, &b| {
                estimator.tick(sink);
                compare(&records[a], &records[b], spec)
            });
            estimator.finish();
            order
        };
        sink.report(100);

        // Put the cursor back on the same game, front of list otherwise.
        let focus_index = focused_id
            .and_then(|id| new_order.iter().position(|&i| records[i].id == id))
            .unwrap_or(0);

        Ok(SortOutcome {
            new_order,
            focus_index,
            cancelled: self.estimator.cancel_requested(),
        })
    }
}

fn validate_unique_ids(records: &[GameRecord]) -> Result<()> {
    let mut seen: HashSet<GameId> = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            log::error(format!("duplicate game id {}", record.id));
            return Err(SortError::DuplicateGameId(record.id));
        }
    }
    Ok(())
}
