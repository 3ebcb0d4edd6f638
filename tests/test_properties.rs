//! Property-based tests for the ranking engine.

use proptest::prelude::*;

use gamelist_sort::compare::compare;
use gamelist_sort::{
    GameRecord, GameResult, NullSink, ProgressSink, SortColumn, SortEngine, SortSpecification,
};
use std::cmp::Ordering;

const NAMES: &[&str] = &["Adams", "Anand", "Botvinnik", "Carlsen", "Ding", "Euwe"];
const ECOS: &[&str] = &["A00", "B12", "B90", "C42", "D37"];

/// Strategy: a list of records with unique ids and deliberately small
/// value pools, so ties on every column are common.
fn records_strategy() -> impl Strategy<Value = Vec<GameRecord>> {
    prop::collection::vec(
        (
            0..NAMES.len(),
            prop::option::of(1000u16..2900),
            0..NAMES.len(),
            prop::option::of(1000u16..2900),
            0..4u8,
            1..6u32,
            0..ECOS.len(),
            prop::collection::vec(0..4u8, 0..6),
        ),
        1..25,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(
                |(i, (white, white_elo, black, black_elo, result, round, eco, blob))| GameRecord {
                    id: i as u32 + 1,
                    white: NAMES[white].to_string(),
                    white_elo,
                    black: NAMES[black].to_string(),
                    black_elo,
                    site_or_event: String::new(),
                    round,
                    result: result_from(result),
                    eco: ECOS[eco].to_string(),
                    ply_count: blob.len() as u32,
                    move_blob: blob,
                    date: None,
                },
            )
            .collect()
    })
}

fn result_from(code: u8) -> GameResult {
    match code {
        0 => GameResult::WhiteWin,
        1 => GameResult::BlackWin,
        2 => GameResult::Draw,
        _ => GameResult::Unresolved,
    }
}

/// Strategy: a short random click sequence over all twelve columns.
fn clicks_strategy() -> impl Strategy<Value = Vec<SortColumn>> {
    prop::collection::vec(
        (0..SortColumn::ALL.len()).prop_map(|i| SortColumn::ALL[i]),
        1..5,
    )
}

fn run_clicks(clicks: &[SortColumn], records: &[GameRecord]) -> Vec<usize> {
    let mut engine = SortEngine::new();
    let mut order: Vec<usize> = (0..records.len()).collect();
    for &column in clicks {
        let displayed: Vec<GameRecord> = order.iter().map(|&i| records[i].clone()).collect();
        let outcome = engine
            .on_column_clicked(column, &displayed, None, &mut NullSink)
            .expect("unique ids by construction");
        order = outcome.new_order.into_iter().map(|i| order[i]).collect();
    }
    order
}

fn spec_from_clicks(clicks: &[SortColumn]) -> SortSpecification {
    let mut spec = SortSpecification::new();
    for &column in clicks {
        spec.toggle_column(column, &[]);
    }
    spec
}

/// Sink recording every report, for the monotonicity property.
#[derive(Default)]
struct RecordingSink(Vec<u8>);

impl ProgressSink for RecordingSink {
    fn report(&mut self, percent: u8) -> bool {
        self.0.push(percent);
        true
    }
}

proptest! {
    // 1. Every sort returns a permutation of the input indices.
    #[test]
    fn sort_is_permutation(records in records_strategy(), clicks in clicks_strategy()) {
        let order = run_clicks(&clicks, &records);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..records.len()).collect::<Vec<_>>());
    }

    // 2. Sorting is deterministic: the same clicks on the same records
    //    always land in the same order.
    #[test]
    fn sort_is_deterministic(records in records_strategy(), clicks in clicks_strategy()) {
        prop_assert_eq!(run_clicks(&clicks, &records), run_clicks(&clicks, &records));
    }

    // 3. The comparator is a strict total order for any key stack:
    //    reflexively equal, antisymmetric, transitive.
    #[test]
    fn comparator_is_strict_total_order(
        records in records_strategy(),
        clicks in clicks_strategy(),
    ) {
        let spec = spec_from_clicks(&clicks);
        let sample = &records[..records.len().min(10)];

        for a in sample {
            prop_assert_eq!(compare(a, a, &spec), Ordering::Equal);
        }
        for a in sample {
            for b in sample {
                prop_assert_eq!(compare(a, b, &spec), compare(b, a, &spec).reverse());
            }
        }
        for a in sample {
            for b in sample {
                for c in sample {
                    if compare(a, b, &spec) != Ordering::Greater
                        && compare(b, c, &spec) != Ordering::Greater
                    {
                        prop_assert_ne!(compare(a, c, &spec), Ordering::Greater);
                    }
                }
            }
        }
    }

    // 4. Distinct records never compare equal (the id fallback makes the
    //    order strict, which is what keeps focus restoration stable).
    #[test]
    fn comparator_never_ties_distinct_ids(
        records in records_strategy(),
        clicks in clicks_strategy(),
    ) {
        let spec = spec_from_clicks(&clicks);
        for a in &records {
            for b in &records {
                if a.id != b.id {
                    prop_assert_ne!(compare(a, b, &spec), Ordering::Equal);
                }
            }
        }
    }

    // 5. Re-sorting an already sorted list under the same stack is the
    //    identity permutation.
    #[test]
    fn resort_is_idempotent(records in records_strategy(), clicks in clicks_strategy()) {
        let mut engine = SortEngine::new();
        let mut displayed = records.clone();
        for &column in &clicks {
            let outcome = engine
                .on_column_clicked(column, &displayed, None, &mut NullSink)
                .unwrap();
            displayed = outcome
                .new_order
                .iter()
                .map(|&i| displayed[i].clone())
                .collect();
        }

        let again = engine.resort(&displayed, None, &mut NullSink).unwrap();
        prop_assert_eq!(again.new_order, (0..records.len()).collect::<Vec<_>>());
    }

    // 6. Clicking the same column a third time restores the first
    //    click's order (flip, flip back).
    #[test]
    fn third_click_matches_first(records in records_strategy(), column in clicks_strategy()) {
        let column = column[0];
        let mut first = SortEngine::new();
        let once = run_with(&mut first, column, &records, 1);
        let mut third = SortEngine::new();
        let thrice = run_with(&mut third, column, &records, 3);
        prop_assert_eq!(once, thrice);
    }

    // 7. Progress reports within one sort never decrease and never pass
    //    100.
    #[test]
    fn progress_is_monotonic_and_bounded(
        records in records_strategy(),
        clicks in clicks_strategy(),
    ) {
        let mut engine = SortEngine::new();
        let mut sink = RecordingSink::default();
        engine
            .on_column_clicked(clicks[0], &records, None, &mut sink)
            .unwrap();

        prop_assert!(!sink.0.is_empty());
        prop_assert!(sink.0.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(sink.0.iter().all(|&p| p <= 100));
        prop_assert_eq!(*sink.0.last().unwrap(), 100);
    }
}

fn run_with(
    engine: &mut SortEngine,
    column: SortColumn,
    records: &[GameRecord],
    times: usize,
) -> Vec<usize> {
    let mut outcome = None;
    for _ in 0..times {
        outcome = Some(
            engine
                .on_column_clicked(column, records, None, &mut NullSink)
                .unwrap(),
        );
    }
    outcome.unwrap().new_order
}
