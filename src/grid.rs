use crate::node::{ContentTree, NodeId, NodeKind};
use crate::spans::SpanOccupancy;

/// Lay out a table node as rows of per-column cell strings.
///
/// Rows come from the table's `TableHead` (header cells) and `TableBody`
/// (data cells) sections in document order. Slots covered by an earlier
/// cell's column or row span are filled with empty strings so later cells land
/// in the column they visually occupy.
pub fn build_grid(tree: &ContentTree, table: NodeId) -> Vec<Vec<String>> {
    let mut spans = SpanOccupancy::new();
    layout(tree, table, &mut spans)
}

fn layout(tree: &ContentTree, table: NodeId, spans: &mut SpanOccupancy) -> Vec<Vec<String>> {
    let table_rows: Vec<(NodeId, NodeKind)> = tree
        .children(table)
        .filter_map(|section| match tree.kind(section) {
            NodeKind::TableHead => Some((section, NodeKind::TableHeaderCell)),
            NodeKind::TableBody => Some((section, NodeKind::TableDataCell)),
            _ => None,
        })
        .flat_map(|(section, cell_kind)| {
            tree.children(section)
                .filter(|&id| tree.kind(id) == NodeKind::TableRow)
                .map(move |row| (row, cell_kind))
        })
        .collect();

    let mut rows = Vec::with_capacity(table_rows.len());
    for (row_index, &(row, cell_kind)) in table_rows.iter().enumerate() {
        // Row spans never claim past the table's last row
        let rows_left = table_rows.len() - row_index;
        rows.push(build_row(tree, row, cell_kind, row_index, rows_left, spans));
    }

    if !spans.is_empty() {
        // Claims behind a short row are never reached by its sweep
        log::debug!("{} span slots left unused after table", spans.len());
    }
    rows
}

fn build_row(
    tree: &ContentTree,
    row: NodeId,
    cell_kind: NodeKind,
    row_index: usize,
    rows_left: usize,
    spans: &mut SpanOccupancy,
) -> Vec<String> {
    let mut out = Vec::new();
    let mut column = 0;

    for cell in tree.children(row).filter(|&id| tree.kind(id) == cell_kind) {
        column = fill_spanned(spans, &mut out, column, row_index);

        out.push(tree.text_content(cell).trim().to_string());

        let node = tree.node(cell);
        let column_span = node.column_span() as usize;
        let row_span = (node.row_span() as usize).min(rows_left);
        if column_span > 1 || row_span > 1 {
            log::debug!(
                "cell at ({column}, {row_index}) spans {column_span} columns, {row_span} rows"
            );
            spans.claim_span(column, row_index, column_span, row_span);
        }
        column += 1;
    }

    fill_spanned(spans, &mut out, column, row_index);
    out
}

/// Push an empty string for each claimed slot starting at `column`, returning
/// the column of the first free slot.
fn fill_spanned(
    spans: &mut SpanOccupancy,
    out: &mut Vec<String>,
    column: usize,
    row: usize,
) -> usize {
    let consumed = spans.sweep(column, row);
    out.extend(std::iter::repeat_n(String::new(), consumed));
    column + consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct TableBuilder {
        tree: ContentTree,
        table: NodeId,
    }

    impl TableBuilder {
        fn new() -> Self {
            let mut tree = ContentTree::new();
            let root = tree.root();
            let table = tree.append(root, NodeKind::Table);
            Self { tree, table }
        }

        fn section(&mut self, kind: NodeKind) -> NodeId {
            self.tree.append(self.table, kind)
        }

        /// Each cell is `(text, column_span, row_span)`.
        fn row(&mut self, section: NodeId, cell_kind: NodeKind, cells: &[(&str, u32, u32)]) {
            let row = self.tree.append(section, NodeKind::TableRow);
            for &(text, column_span, row_span) in cells {
                let cell = self.tree.append(row, cell_kind);
                self.tree.append_text(cell, text);
                self.tree.set_spans(cell, column_span, row_span);
            }
        }

        fn grid(&self) -> Vec<Vec<String>> {
            build_grid(&self.tree, self.table)
        }
    }

    fn rows(expected: &[&[&str]]) -> Vec<Vec<String>> {
        expected
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn plain_table() {
        let mut t = TableBuilder::new();
        let head = t.section(NodeKind::TableHead);
        t.row(head, NodeKind::TableHeaderCell, &[("A", 1, 1), ("B", 1, 1)]);
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("1", 1, 1), ("2", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["A", "B"], &["1", "2"]]));
    }

    #[test]
    fn column_span_fills_the_covered_column() {
        let mut t = TableBuilder::new();
        let head = t.section(NodeKind::TableHead);
        t.row(
            head,
            NodeKind::TableHeaderCell,
            &[("a", 1, 1), ("b", 1, 1), ("c", 1, 1)],
        );
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("X", 2, 1), ("Y", 1, 1)]);

        assert_eq!(t.grid()[1], vec!["X", "", "Y"]);
    }

    #[test]
    fn row_span_shifts_next_row() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("tall", 1, 2), ("b", 1, 1)]);
        t.row(body, NodeKind::TableDataCell, &[("next", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["tall", "b"], &["", "next"]]));
    }

    #[test]
    fn trailing_spanned_columns_are_filled() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("a", 1, 1), ("b", 1, 2)]);
        t.row(body, NodeKind::TableDataCell, &[("c", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["a", "b"], &["c", ""]]));
    }

    #[test]
    fn rectangle_span() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("big", 2, 2), ("r0", 1, 1)]);
        t.row(body, NodeKind::TableDataCell, &[("r1", 1, 1)]);
        t.row(
            body,
            NodeKind::TableDataCell,
            &[("x", 1, 1), ("y", 1, 1), ("z", 1, 1)],
        );

        assert_eq!(
            t.grid(),
            rows(&[&["big", "", "r0"], &["", "", "r1"], &["x", "y", "z"]])
        );
    }

    #[test]
    fn header_row_span_reaches_into_body() {
        let mut t = TableBuilder::new();
        let head = t.section(NodeKind::TableHead);
        t.row(head, NodeKind::TableHeaderCell, &[("H", 1, 2), ("I", 1, 1)]);
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("v", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["H", "I"], &["", "v"]]));
    }

    #[test]
    fn gap_in_claims_stops_the_sweep() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(
            body,
            NodeKind::TableDataCell,
            &[("a", 1, 1), ("b", 1, 1), ("c", 1, 2)],
        );
        t.row(body, NodeKind::TableDataCell, &[("d", 1, 1), ("e", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["a", "b", "c"], &["d", "e", ""]]));
    }

    #[test]
    fn cells_of_the_wrong_kind_are_skipped() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(
            body,
            NodeKind::TableHeaderCell,
            &[("stray", 1, 1)],
        );
        let row = t.tree.first_child(body).unwrap();
        let cell = t.tree.append(row, NodeKind::TableDataCell);
        t.tree.append_text(cell, "kept");

        assert_eq!(t.grid(), rows(&[&["kept"]]));
    }

    #[test]
    fn cell_text_is_trimmed() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("  padded \n", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["padded"]]));
    }

    #[test]
    fn row_span_past_the_last_row_claims_nothing_extra() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("huge", 1000, 65534)]);

        let mut spans = SpanOccupancy::new();
        let grid = layout(&t.tree, t.table, &mut spans);

        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 1000);
        assert_eq!(grid[0][0], "huge");
        assert!(spans.is_empty());
    }

    #[test]
    fn row_span_clamped_to_remaining_rows() {
        let mut t = TableBuilder::new();
        let body = t.section(NodeKind::TableBody);
        t.row(body, NodeKind::TableDataCell, &[("a", 1, 500), ("b", 1, 1)]);
        t.row(body, NodeKind::TableDataCell, &[("c", 1, 1)]);

        assert_eq!(t.grid(), rows(&[&["a", "b"], &["", "c"]]));
    }

    #[test]
    fn table_without_sections_is_empty() {
        let t = TableBuilder::new();
        assert!(t.grid().is_empty());
    }
}
