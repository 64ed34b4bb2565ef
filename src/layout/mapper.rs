//! Position mapping: fragments to (row, column) grid cells.

use crate::error::Result;
use crate::model::{Fragment, GridCell, PlacedFragment};

use super::binner::{AxisBinner, AxisRange};

/// Observed ranges of one page, per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRanges {
    /// Range of x coordinates (columns)
    pub x: AxisRange,
    /// Range of y coordinates (rows)
    pub y: AxisRange,
}

impl PageRanges {
    /// Ranges observed among `fragments`, or `None` for an empty page.
    ///
    /// An axis with no finite coordinate at all collapses to a single point,
    /// so its fragments still land in class 0 instead of being dropped.
    pub fn observe(fragments: &[Fragment]) -> Option<Self> {
        if fragments.is_empty() {
            return None;
        }
        Some(Self {
            x: observe_axis(fragments.iter().map(|f| f.x)),
            y: observe_axis(fragments.iter().map(|f| f.y)),
        })
    }

    /// Whether either axis collapsed to a single point.
    pub fn is_degenerate(&self) -> bool {
        self.x.is_degenerate() || self.y.is_degenerate()
    }
}

fn observe_axis(values: impl Iterator<Item = f64>) -> AxisRange {
    AxisRange::from_values(values).unwrap_or(AxisRange::new(0.0, 0.0))
}

/// Labels every fragment of a page with its grid cell.
///
/// Ranges are always taken from the page being mapped, so pages of different
/// scale or resolution are normalized to the same grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMapper {
    num_rows: usize,
    num_columns: usize,
}

impl PositionMapper {
    /// Create a mapper. Fails if either dimension is zero.
    pub fn new(num_rows: usize, num_columns: usize) -> Result<Self> {
        // Validate both dimensions up front, independent of page content.
        let unit = AxisRange::new(0.0, 1.0);
        AxisBinner::new(unit, num_rows)?;
        AxisBinner::new(unit, num_columns)?;
        Ok(Self {
            num_rows,
            num_columns,
        })
    }

    /// Attach a grid cell to every fragment, keeping input order.
    ///
    /// Returns the placed fragments and the ranges used, or no ranges for an
    /// empty page.
    pub fn map(&self, fragments: Vec<Fragment>) -> Result<(Vec<PlacedFragment>, Option<PageRanges>)> {
        let Some(ranges) = PageRanges::observe(&fragments) else {
            return Ok((Vec::new(), None));
        };

        let rows = AxisBinner::new(ranges.y, self.num_rows)?;
        let columns = AxisBinner::new(ranges.x, self.num_columns)?;

        let placed = fragments
            .into_iter()
            .map(|fragment| {
                let cell = GridCell::new(rows.classify(fragment.y), columns.classify(fragment.x));
                PlacedFragment::new(fragment, cell)
            })
            .collect();

        Ok((placed, Some(ranges)))
    }
}

/// Map a page's fragments onto a `num_rows` x `num_columns` grid.
pub fn map_positions(
    fragments: Vec<Fragment>,
    num_rows: usize,
    num_columns: usize,
) -> Result<Vec<PlacedFragment>> {
    let (placed, _) = PositionMapper::new(num_rows, num_columns)?.map(fragments)?;
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_map_two_rows() {
        let fragments = vec![
            Fragment::new("Hello", 0.0, 0.0),
            Fragment::new("World", 50.0, 1.0),
        ];
        let placed = map_positions(fragments, 2, 2).unwrap();

        assert_eq!(placed[0].cell, GridCell::new(0, 0));
        assert_eq!(placed[1].cell, GridCell::new(1, 1));
    }

    #[test]
    fn test_map_keeps_order() {
        let fragments = vec![
            Fragment::new("c", 90.0, 0.0),
            Fragment::new("a", 0.0, 0.0),
            Fragment::new("b", 45.0, 0.0),
        ];
        let placed = map_positions(fragments, 5, 10).unwrap();
        let texts: Vec<_> = placed.iter().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_map_empty_page() {
        let mapper = PositionMapper::new(35, 20).unwrap();
        let (placed, ranges) = mapper.map(Vec::new()).unwrap();
        assert!(placed.is_empty());
        assert!(ranges.is_none());
    }

    #[test]
    fn test_map_degenerate_axis() {
        // Every fragment on the same baseline: one row.
        let fragments = vec![
            Fragment::new("a", 0.0, 10.0),
            Fragment::new("b", 40.0, 10.0),
            Fragment::new("c", 80.0, 10.0),
        ];
        let mapper = PositionMapper::new(35, 4).unwrap();
        let (placed, ranges) = mapper.map(fragments).unwrap();

        assert!(ranges.unwrap().is_degenerate());
        assert!(placed.iter().all(|p| p.row() == 0));
        assert_eq!(
            placed.iter().map(|p| p.column()).collect::<Vec<_>>(),
            vec![0, 2, 3]
        );
    }

    #[test]
    fn test_map_non_finite_axis_keeps_fragments() {
        let mapper = PositionMapper::new(35, 20).unwrap();

        let fragments = vec![
            Fragment::new("A", f64::NAN, 0.0),
            Fragment::new("B", f64::NAN, 10.0),
        ];
        let (placed, ranges) = mapper.map(fragments).unwrap();
        assert_eq!(placed.len(), 2);
        assert!(ranges.unwrap().is_degenerate());
        assert!(placed.iter().all(|p| p.column() == 0));
        assert_eq!(placed[0].row(), 0);
        assert_eq!(placed[1].row(), 34);

        let fragments = vec![
            Fragment::new("A", 0.0, f64::INFINITY),
            Fragment::new("B", 5.0, f64::NEG_INFINITY),
        ];
        let (placed, _) = mapper.map(fragments).unwrap();
        assert_eq!(placed.len(), 2);
        assert!(placed.iter().all(|p| p.row() == 0));
    }

    #[test]
    fn test_mapper_rejects_zero_dimensions() {
        assert!(matches!(
            PositionMapper::new(0, 20),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            PositionMapper::new(35, 0),
            Err(Error::Configuration(_))
        ));
    }
}
