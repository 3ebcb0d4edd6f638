use smallvec::SmallVec;

use crate::types::{GameRecord, SortColumn};

/// One entry of the sort-key stack. `forward` is the direction relative to
/// the column's default, not absolute ascending/descending; see
/// `SortColumn::reversed_by_default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: SortColumn,
    pub forward: bool,
}

/// The click-driven sort criteria: the most recent click is the primary
/// key, earlier clicks remain below it as tie-breaks. Persists across
/// sorts (it is the sort history of one game list).
#[derive(Debug, Clone, Default)]
pub struct SortSpecification {
    keys: SmallVec<[SortKey; SortColumn::COUNT]>,
    last_clicked: Option<SortColumn>,
}

impl SortSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys in priority order, primary first.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn contains(&self, column: SortColumn) -> bool {
        self.keys.iter().any(|k| k.column == column)
    }

    pub fn position(&self, column: SortColumn) -> Option<usize> {
        self.keys.iter().position(|k| k.column == column)
    }

    /// Apply one column-header click.
    ///
    /// Clicking the same column twice in a row flips its direction in
    /// place. Clicking a different column pushes it on top as a forward
    /// key; if that column already sat lower in the stack, the stack is
    /// truncated at the old occurrence, discarding the tie-breaks below
    /// it.
    ///
    /// The Id column gets special treatment against `current_order` (the
    /// records as presently displayed): if the list is already fully
    /// ascending by id the new key is forced backward, if fully descending
    /// it is forced forward, so an Id click always changes what the user
    /// sees even though id is also the implicit final tie-break.
    pub fn toggle_column(&mut self, column: SortColumn, current_order: &[GameRecord]) {
        if self.last_clicked == Some(column)
            && self.keys.first().map(|k| k.column) == Some(column)
        {
            self.keys[0].forward = !self.keys[0].forward;
        } else {
            if let Some(old) = self.position(column) {
                // Drop the old occurrence and every tie-break below it.
                self.keys.truncate(old);
            }
            self.keys.truncate(SortColumn::COUNT - 1);
            self.keys.insert(
                0,
                SortKey {
                    column,
                    forward: true,
                },
            );
        }

        if column == SortColumn::Id {
            if ids_ascending(current_order) {
                self.keys[0].forward = false;
            } else if ids_descending(current_order) {
                self.keys[0].forward = true;
            }
        }

        self.last_clicked = Some(column);
    }
}

fn ids_ascending(records: &[GameRecord]) -> bool {
    records.windows(2).all(|w| w[0].id <= w[1].id)
}

fn ids_descending(records: &[GameRecord]) -> bool {
    records.windows(2).all(|w| w[0].id >= w[1].id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameId;

    fn records_with_ids(ids: &[GameId]) -> Vec<GameRecord> {
        ids.iter()
            .map(|&id| GameRecord {
                id,
                ..Default::default()
            })
            .collect()
    }

    fn columns(spec: &SortSpecification) -> Vec<SortColumn> {
        spec.keys().iter().map(|k| k.column).collect()
    }

    #[test]
    fn test_first_toggle_pushes_forward_key() {
        let mut spec = SortSpecification::new();
        spec.toggle_column(SortColumn::White, &[]);

        assert_eq!(spec.keys(), &[SortKey {
            column: SortColumn::White,
            forward: true
        }]);
    }

    #[test]
    fn test_repeat_click_flips_direction_in_place() {
        let mut spec = SortSpecification::new();
        spec.toggle_column(SortColumn::White, &[]);
        spec.toggle_column(SortColumn::Black, &[]);
        spec.toggle_column(SortColumn::Black, &[]);

        assert_eq!(columns(&spec), vec![SortColumn::Black, SortColumn::White]);
        assert!(!spec.keys()[0].forward);
        assert!(spec.keys()[1].forward);

        spec.toggle_column(SortColumn::Black, &[]);
        assert!(spec.keys()[0].forward);
    }

    #[test]
    fn test_new_click_stacks_previous_keys_below() {
        let mut spec = SortSpecification::new();
        spec.toggle_column(SortColumn::White, &[]);
        spec.toggle_column(SortColumn::Black, &[]);
        spec.toggle_column(SortColumn::Eco, &[]);

        assert_eq!(
            columns(&spec),
            vec![SortColumn::Eco, SortColumn::Black, SortColumn::White]
        );
    }

    #[test]
    fn test_reclick_of_buried_column_truncates_stack() {
        let mut spec = SortSpecification::new();
        spec.toggle_column(SortColumn::White, &[]);
        spec.toggle_column(SortColumn::Black, &[]);
        spec.toggle_column(SortColumn::Eco, &[]);
        // White is at the bottom; clicking it again discards everything
        // at and below its old slot.
        spec.toggle_column(SortColumn::White, &[]);

        assert_eq!(
            columns(&spec),
            vec![SortColumn::White, SortColumn::Eco, SortColumn::Black]
        );
        assert!(spec.keys()[0].forward);
    }

    #[test]
    fn test_reclick_of_middle_column_discards_tiebreaks_below() {
        let mut spec = SortSpecification::new();
        spec.toggle_column(SortColumn::White, &[]);
        spec.toggle_column(SortColumn::Black, &[]);
        spec.toggle_column(SortColumn::Eco, &[]);
        spec.toggle_column(SortColumn::Black, &[]);

        assert_eq!(columns(&spec), vec![SortColumn::Black, SortColumn::Eco]);
    }

    #[test]
    fn test_stack_capped_at_column_count() {
        let mut spec = SortSpecification::new();
        for col in SortColumn::ALL {
            spec.toggle_column(col, &[]);
        }
        assert_eq!(spec.keys().len(), SortColumn::COUNT);

        // One more distinct cycle keeps the stack within bounds.
        spec.toggle_column(SortColumn::White, &[]);
        assert!(spec.keys().len() <= SortColumn::COUNT);
    }

    #[test]
    fn test_id_click_on_ascending_list_forces_backward() {
        let mut spec = SortSpecification::new();
        let records = records_with_ids(&[1, 2, 3, 4]);
        spec.toggle_column(SortColumn::Id, &records);

        assert_eq!(spec.keys()[0].column, SortColumn::Id);
        assert!(!spec.keys()[0].forward);
    }

    #[test]
    fn test_id_click_on_descending_list_forces_forward() {
        let mut spec = SortSpecification::new();
        let records = records_with_ids(&[4, 3, 2, 1]);
        spec.toggle_column(SortColumn::Id, &records);
        // A repeat click would normally flip, but forcing wins again.
        spec.toggle_column(SortColumn::Id, &records);

        assert!(spec.keys()[0].forward);
    }

    #[test]
    fn test_id_click_on_mixed_list_is_not_forced() {
        let mut spec = SortSpecification::new();
        let records = records_with_ids(&[2, 1, 3]);
        spec.toggle_column(SortColumn::Id, &records);

        assert!(spec.keys()[0].forward);
    }
}
