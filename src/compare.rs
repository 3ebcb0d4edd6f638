use std::cmp::Ordering;

use crate::criteria::{SortKey, SortSpecification};
use crate::types::{GameRecord, SortColumn};

/// Natural ascending comparison of one column, before any direction flags
/// are applied. Strings compare by byte order, numbers by value, missing
/// values (`None`) below everything.
pub fn compare_column(column: SortColumn, a: &GameRecord, b: &GameRecord) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::White => a.white.cmp(&b.white),
        SortColumn::WhiteElo => a.white_elo.cmp(&b.white_elo),
        SortColumn::Black => a.black.cmp(&b.black),
        SortColumn::BlackElo => a.black_elo.cmp(&b.black_elo),
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::SiteOrEvent => a.site_or_event.cmp(&b.site_or_event),
        SortColumn::Round => a.round.cmp(&b.round),
        SortColumn::Result => a.result.cmp(&b.result),
        SortColumn::Eco => a.eco.cmp(&b.eco),
        SortColumn::PlyCount => a.ply_count.cmp(&b.ply_count),
        // Only reached when a Moves key is compared outside the
        // move-frequency path; whole-blob byte order keeps the comparator
        // total.
        SortColumn::Moves => a.move_blob.cmp(&b.move_blob),
    }
}

/// One key's comparison with both direction flags folded in: the column's
/// reversed-by-default constant first, then the key's `forward` flag.
pub fn compare_with_key(key: SortKey, a: &GameRecord, b: &GameRecord) -> Ordering {
    let mut ord = compare_column(key.column, a, b);
    if key.column.reversed_by_default() {
        ord = ord.reverse();
    }
    if key.forward { ord } else { ord.reverse() }
}

/// Stacked lexicographic comparison: first differing key wins; a fully
/// exhausted stack falls back to ascending game id, so the result is a
/// strict total order whenever ids are unique.
pub fn compare(a: &GameRecord, b: &GameRecord, spec: &SortSpecification) -> Ordering {
    for key in spec.keys() {
        let ord = compare_with_key(*key, a, b);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.id.cmp(&b.id)
}

/// True when `a` and `b` compare equal on `keys` (used to find fragment
/// boundaries: runs equal on every key ranked above the Moves key).
pub fn equal_on_keys(keys: &[SortKey], a: &GameRecord, b: &GameRecord) -> bool {
    keys.iter()
        .all(|k| compare_column(k.column, a, b) == Ordering::Equal)
}
