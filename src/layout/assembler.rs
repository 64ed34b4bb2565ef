//! Line assembly: grouping placed fragments into ordered lines.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{Line, PlacedFragment};

/// Group fragments by row and order each row left to right.
///
/// Rows come out in ascending order and rows without fragments are never
/// produced. Within a row fragments are ordered by column, then raw x. The
/// remaining keys (y, then text) only matter for fragments at the exact same
/// x, and make the result independent of recognition order.
pub fn assemble_lines(placed: Vec<PlacedFragment>) -> Vec<Line> {
    let mut rows: BTreeMap<usize, Vec<PlacedFragment>> = BTreeMap::new();
    for fragment in placed {
        rows.entry(fragment.row()).or_default().push(fragment);
    }

    rows.into_iter()
        .map(|(row, mut fragments)| {
            fragments.sort_by(compare_in_line);
            Line::new(row, fragments)
        })
        .collect()
}

fn compare_in_line(a: &PlacedFragment, b: &PlacedFragment) -> Ordering {
    a.column()
        .cmp(&b.column())
        .then_with(|| a.fragment.x.total_cmp(&b.fragment.x))
        .then_with(|| a.fragment.y.total_cmp(&b.fragment.y))
        .then_with(|| a.fragment.text.cmp(&b.fragment.text))
}
