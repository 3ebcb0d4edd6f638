//! Move-column sorting: games are ranked by how popular each successive
//! move is among their neighbors, not by the lexical value of the moves
//! themselves. A conventional stable sort establishes a deterministic
//! baseline, then an iterative per-ply refinement regroups games so the
//! most played branch at every depth floats to the top of its range.

use std::cmp::Ordering;

use crate::compare::{compare, compare_with_key, equal_on_keys};
use crate::criteria::{SortKey, SortSpecification};
use crate::decoder::{MoveDecoder, MoveToken, TranspositionClassifier};
use crate::log;
use crate::progress::{ProgressEstimator, ProgressSink};
use crate::types::{GameRecord, SortColumn};

/// Refinement stops for any range that reaches this ply depth; only
/// pathological identical-prefix inputs get anywhere near it.
const MAX_REFINE_DEPTH: usize = 1024;

/// Working element, one per record, alive for a single invocation.
struct MoveGroup {
    record: usize,
    tokens: Vec<MoveToken>,
    cursor: usize,
    transpo: i32,
    tie_break: usize,
    run_count: usize,
    /// Token shared by this element's current clump; `None` once the
    /// token stream is exhausted.
    clump_token: Option<MoveToken>,
}

impl MoveGroup {
    fn next_token(&self) -> Option<MoveToken> {
        self.tokens.get(self.cursor).copied()
    }
}

/// Range of the working array still awaiting refinement at `depth` plies
/// past each element's starting cursor.
struct RefineRange {
    lo: usize,
    hi: usize,
    depth: usize,
}

/// Sort `records` under a key stack containing the Moves column. Returns
/// the permutation of input indices. Phase 1 (a conventional stable sort
/// over the full stack, with the Moves key comparing transposition group
/// then raw token order) runs through the estimator and reports into the
/// lower half of the progress range; the refinement phases report into
/// the upper half.
pub fn sort_by_move_frequency(
    records: &[GameRecord],
    spec: &SortSpecification,
    decoder: &dyn MoveDecoder,
    classifier: Option<&dyn TranspositionClassifier>,
    estimator: &mut ProgressEstimator,
    sink: &mut dyn ProgressSink,
) -> Vec<usize> {
    let n = records.len();
    let Some(moves_pos) = spec.position(SortColumn::Moves) else {
        // Not reachable through the engine; sort plainly for totality.
        let mut order: Vec<usize> = (0..n).collect();
        estimator.begin(n, 0, 100);
        order.sort_by(|&a, &b| {
            estimator.tick(sink);
            compare(&records[a], &records[b], spec)
        });
        estimator.finish();
        return order;
    };
    if n < 2 {
        return (0..n).collect();
    }

    let keys = spec.keys();
    let moves_forward = keys[moves_pos].forward;

    // Intermediate representation: decode every blob once; the
    // transposition prefix, when classified, is already accounted for by
    // the group id and is skipped.
    let mut elements: Vec<MoveGroup> = records
        .iter()
        .enumerate()
        .map(|(record, r)| {
            let class = classifier
                .map(|c| c.classify(&r.move_blob))
                .unwrap_or_default();
            let tokens: Vec<MoveToken> = decoder
                .decode(&r.move_blob)
                .skip(class.prefix_plies)
                .collect();
            MoveGroup {
                record,
                tokens,
                cursor: 0,
                transpo: class.group,
                tie_break: 0,
                run_count: 0,
                clump_token: None,
            }
        })
        .collect();

    // Phase 1: baseline order over the whole stack.
    estimator.begin(n, 0, 50);
    elements.sort_by(|a, b| {
        estimator.tick(sink);
        compare_elements(records, keys, a, b)
    });
    estimator.finish();

    for (position, element) in elements.iter_mut().enumerate() {
        element.tie_break = position;
    }

    // Phase 0: fragments, i.e. maximal runs equal on every key ranked
    // above Moves (and on transposition group when grouping is active).
    // When Moves is primary there is exactly one run: everything.
    let above = &keys[..moves_pos];
    let grouped = classifier.is_some();
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut start = 0;
    for i in 1..=n {
        let boundary = i == n || !same_fragment(records, above, grouped, &elements[i - 1], &elements[i]);
        if boundary {
            if i - start > 1 {
                runs.push((start, i));
            }
            start = i;
        }
    }
    log::debug(format!(
        "move column sort: n={n}, refinement runs={}",
        runs.len()
    ));

    // Phases 2/3: per-ply refinement over an explicit worklist.
    let total: usize = runs.iter().map(|&(lo, hi)| hi - lo).sum();
    let mut finalized = 0usize;
    let mut passes = 0u64;
    let mut worklist: Vec<RefineRange> = runs
        .into_iter()
        .map(|(lo, hi)| RefineRange { lo, hi, depth: 0 })
        .collect();

    while let Some(RefineRange { lo, hi, depth }) = worklist.pop() {
        passes += 1;
        if depth >= MAX_REFINE_DEPTH {
            log::warn(format!(
                "move column sort: abandoning range of {} games at ply depth {depth}",
                hi - lo
            ));
            finalized += hi - lo;
            report_refinement(sink, estimator, finalized, total);
            continue;
        }

        // Clump consecutive elements sharing the next token. Every clump
        // member learns the clump size; exhausted streams count zero and
        // never advance, so a continuing branch outranks any number of
        // finished games under a forward key.
        let mut i = lo;
        while i < hi {
            let token = elements[i].next_token();
            let mut j = i + 1;
            while j < hi && elements[j].next_token() == token {
                j += 1;
            }
            let count = if token.is_some() { j - i } else { 0 };
            for element in &mut elements[i..j] {
                element.run_count = count;
                element.clump_token = token;
                if token.is_some() {
                    element.cursor += 1;
                }
            }
            i = j;
        }

        // Reorder clumps by popularity; the phase-1 tie-break keeps
        // equally popular clumps (and their members) in a stable order.
        elements[lo..hi].sort_by(|a, b| {
            if a.run_count == b.run_count {
                a.tie_break.cmp(&b.tie_break)
            } else if moves_forward {
                b.run_count.cmp(&a.run_count)
            } else {
                a.run_count.cmp(&b.run_count)
            }
        });

        // Clumps that can still change order at the next ply go back on
        // the worklist; singletons and finished games are final.
        let mut i = lo;
        while i < hi {
            let mut j = i + 1;
            while j < hi
                && elements[j].run_count == elements[i].run_count
                && elements[j].clump_token == elements[i].clump_token
            {
                j += 1;
            }
            if j - i > 1 && elements[i].clump_token.is_some() {
                worklist.push(RefineRange {
                    lo: i,
                    hi: j,
                    depth: depth + 1,
                });
            } else {
                finalized += j - i;
            }
            i = j;
        }

        report_refinement(sink, estimator, finalized, total);
    }
    log::debug(format!("move column sort: {passes} refinement passes"));

    elements.into_iter().map(|e| e.record).collect()
}

fn compare_elements(
    records: &[GameRecord],
    keys: &[SortKey],
    a: &MoveGroup,
    b: &MoveGroup,
) -> Ordering {
    for key in keys {
        let ord = if key.column == SortColumn::Moves {
            let ord = a
                .transpo
                .cmp(&b.transpo)
                .then_with(|| a.tokens.cmp(&b.tokens));
            if key.forward { ord } else { ord.reverse() }
        } else {
            compare_with_key(*key, &records[a.record], &records[b.record])
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    records[a.record].id.cmp(&records[b.record].id)
}

fn same_fragment(
    records: &[GameRecord],
    above: &[SortKey],
    grouped: bool,
    a: &MoveGroup,
    b: &MoveGroup,
) -> bool {
    equal_on_keys(above, &records[a.record], &records[b.record])
        && (!grouped || a.transpo == b.transpo)
}

fn report_refinement(
    sink: &mut dyn ProgressSink,
    estimator: &mut ProgressEstimator,
    finalized: usize,
    total: usize,
) {
    let percent = 50 + (finalized * 50 / total.max(1)) as u8;
    if !sink.report(percent.min(100)) {
        estimator.flag_cancel();
    }
}
