use std::collections::BTreeSet;

/// Grid slots of one table that an earlier cell's column or row span has
/// already claimed.
///
/// Slots are stored as `(row, column)` so iteration runs row by row in
/// ascending column order.
#[derive(Debug, Default, Clone)]
pub struct SpanOccupancy {
    slots: BTreeSet<(usize, usize)>,
}

impl SpanOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `(column, row)` as occupied. Claiming a slot twice is a no-op.
    pub fn claim(&mut self, column: usize, row: usize) {
        self.slots.insert((row, column));
    }

    /// Remove the claim at `(column, row)`, returning whether there was one.
    pub fn consume_if_present_at(&mut self, column: usize, row: usize) -> bool {
        self.slots.remove(&(row, column))
    }

    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.slots.contains(&(row, column))
    }

    /// Claim the full rectangle a cell covers, except its origin slot.
    pub fn claim_span(&mut self, column: usize, row: usize, column_span: usize, row_span: usize) {
        for r in row..row + row_span.max(1) {
            for c in column..column + column_span.max(1) {
                if (c, r) != (column, row) {
                    self.claim(c, r);
                }
            }
        }
    }

    /// Consume the contiguous run of claimed slots starting exactly at
    /// `column` in `row`. Returns the number of slots consumed.
    pub fn sweep(&mut self, column: usize, row: usize) -> usize {
        let mut consumed = 0;
        while self.consume_if_present_at(column + consumed, row) {
            consumed += 1;
        }
        consumed
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_idempotent() {
        let mut spans = SpanOccupancy::new();
        spans.claim(1, 0);
        spans.claim(1, 0);
        assert_eq!(spans.len(), 1);
        assert!(spans.is_occupied(1, 0));
    }

    #[test]
    fn consume_removes_the_claim() {
        let mut spans = SpanOccupancy::new();
        spans.claim(2, 3);
        assert!(spans.consume_if_present_at(2, 3));
        assert!(!spans.consume_if_present_at(2, 3));
        assert!(spans.is_empty());
    }

    #[test]
    fn consume_distinguishes_column_and_row() {
        let mut spans = SpanOccupancy::new();
        spans.claim(0, 1);
        assert!(!spans.consume_if_present_at(1, 0));
        assert!(spans.consume_if_present_at(0, 1));
    }

    #[test]
    fn claim_span_skips_origin() {
        let mut spans = SpanOccupancy::new();
        spans.claim_span(1, 0, 2, 2);
        assert!(!spans.is_occupied(1, 0));
        assert!(spans.is_occupied(2, 0));
        assert!(spans.is_occupied(1, 1));
        assert!(spans.is_occupied(2, 1));
        assert_eq!(spans.len(), 3);
    }

    #[test]
    fn claim_span_of_one_claims_nothing() {
        let mut spans = SpanOccupancy::new();
        spans.claim_span(4, 4, 1, 1);
        assert!(spans.is_empty());
    }

    #[test]
    fn sweep_stops_at_gap() {
        let mut spans = SpanOccupancy::new();
        spans.claim(0, 0);
        spans.claim(1, 0);
        spans.claim(3, 0);

        assert_eq!(spans.sweep(0, 0), 2);
        assert!(spans.is_occupied(3, 0));
        assert_eq!(spans.sweep(2, 0), 0);
    }

    #[test]
    fn sweep_only_touches_its_row() {
        let mut spans = SpanOccupancy::new();
        spans.claim(0, 1);
        assert_eq!(spans.sweep(0, 0), 0);
        assert_eq!(spans.sweep(0, 1), 1);
    }
}
