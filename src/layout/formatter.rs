//! Line formatting: tab runs that approximate horizontal gaps.
//!
//! This is a lossy heuristic. Gaps are measured in grid columns, scaled by
//! `(font_size_regulator + 1) / space_redutor` and reduced by the tab cells the
//! previous fragment's own text already covers:
//!
//! ```text
//! tabs = floor(gap * (font_size_regulator + 1) / space_redutor) - prev_chars / TAB_WIDTH
//! ```
//!
//! A non-positive result becomes a single space, so fragments are never glued
//! together.

use crate::error::{Error, Result};
use crate::model::{Line, PlacedFragment};

use super::options::LayoutOptions;

/// Characters covered by one tab stop.
pub const TAB_WIDTH: usize = 8;

/// Renders lines with tab spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormatter {
    space_redutor: usize,
    font_size_regulator: usize,
    indent_first: bool,
}

impl LineFormatter {
    /// Create a formatter. Fails if `space_redutor` is zero.
    pub fn new(space_redutor: usize, font_size_regulator: usize) -> Result<Self> {
        if space_redutor == 0 {
            return Err(Error::Configuration(
                "space_redutor must be greater than 0".into(),
            ));
        }
        Ok(Self {
            space_redutor,
            font_size_regulator,
            indent_first: true,
        })
    }

    /// Create a formatter from layout options.
    pub fn from_options(options: &LayoutOptions) -> Result<Self> {
        Ok(Self::new(options.space_redutor, options.font_size_regulator)?
            .with_indent(options.indent_first))
    }

    /// Enable or disable first-fragment indentation.
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent_first = indent;
        self
    }

    /// Tabs spanning `gap` columns, before subtracting occupied cells.
    fn scaled_gap(&self, gap: usize) -> usize {
        gap.saturating_mul(self.font_size_regulator + 1) / self.space_redutor
    }

    /// Tabs inserted between `previous` and `current`; zero means a single space.
    pub fn tab_count(&self, previous: &PlacedFragment, current: &PlacedFragment) -> usize {
        let gap = current.column().saturating_sub(previous.column());
        let occupied = previous.fragment.char_count() / TAB_WIDTH;
        self.scaled_gap(gap).saturating_sub(occupied)
    }

    /// Tabs placed before the first fragment of a line.
    pub fn first_indent(&self, first: &PlacedFragment) -> usize {
        if self.indent_first {
            self.scaled_gap(first.column())
        } else {
            0
        }
    }

    /// Render one line.
    pub fn format(&self, line: &Line) -> String {
        let mut output = String::new();
        let mut previous: Option<&PlacedFragment> = None;

        for fragment in &line.fragments {
            match previous {
                None => push_tabs(&mut output, self.first_indent(fragment)),
                Some(prev) => match self.tab_count(prev, fragment) {
                    0 => output.push(' '),
                    tabs => push_tabs(&mut output, tabs),
                },
            }
            output.push_str(fragment.text());
            previous = Some(fragment);
        }

        output
    }
}

fn push_tabs(output: &mut String, count: usize) {
    output.extend(std::iter::repeat('\t').take(count));
}

/// Render `line` with the given spacing knobs and first-fragment indentation.
pub fn format_line(line: &Line, space_redutor: usize, font_size_regulator: usize) -> Result<String> {
    Ok(LineFormatter::new(space_redutor, font_size_regulator)?.format(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fragment, GridCell};

    fn placed(text: &str, column: usize) -> PlacedFragment {
        PlacedFragment::new(
            Fragment::new(text, column as f64 * 10.0, 0.0),
            GridCell::new(0, column),
        )
    }

    fn line(fragments: Vec<PlacedFragment>) -> Line {
        Line::new(0, fragments)
    }

    #[test]
    fn test_single_fragment_at_origin() {
        let output = format_line(&line(vec![placed("Hello", 0)]), 8, 6).unwrap();
        assert_eq!(output, "Hello");
    }

    #[test]
    fn test_close_fragments_get_a_space() {
        let output = format_line(&line(vec![placed("net", 0), placed("total", 1)]), 8, 6).unwrap();
        assert_eq!(output, "net total");
    }

    #[test]
    fn test_wide_gap_gets_tabs() {
        // gap 9 columns: floor(9 * 7 / 8) = 7 tabs, "A" covers no tab cell.
        let output = format_line(&line(vec![placed("A", 0), placed("B", 9)]), 8, 6).unwrap();
        assert_eq!(output, "A\t\t\t\t\t\t\tB");
    }

    #[test]
    fn test_previous_text_consumes_tabs() {
        // 17 characters cover two tab cells: 7 - 2 = 5 tabs.
        let output = format_line(
            &line(vec![placed("Description of it", 0), placed("12.50", 9)]),
            8,
            6,
        )
        .unwrap();
        assert_eq!(output, "Description of it\t\t\t\t\t12.50");
    }

    #[test]
    fn test_first_fragment_indent() {
        let formatter = LineFormatter::new(8, 6).unwrap();
        let output = formatter.format(&line(vec![placed("Total", 8)]));
        assert_eq!(output, "\t\t\t\t\t\t\tTotal");

        let flat = formatter.with_indent(false).format(&line(vec![placed("Total", 8)]));
        assert_eq!(flat, "Total");
    }

    #[test]
    fn test_smaller_redutor_never_fewer_tabs() {
        let formatter_10 = LineFormatter::new(10, 6).unwrap();
        let formatter_50 = LineFormatter::new(50, 6).unwrap();
        let a = placed("A", 0);
        let b = placed("B", 9);
        assert!(formatter_10.tab_count(&a, &b) >= formatter_50.tab_count(&a, &b));
        assert!(formatter_10.tab_count(&a, &b) > 0);
    }

    #[test]
    fn test_larger_regulator_never_fewer_tabs() {
        let a = placed("A", 0);
        let b = placed("B", 5);
        let mut previous = 0;
        for regulator in 0..12 {
            let tabs = LineFormatter::new(8, regulator).unwrap().tab_count(&a, &b);
            assert!(tabs >= previous);
            previous = tabs;
        }
    }

    #[test]
    fn test_same_column_gets_a_space() {
        let output = format_line(&line(vec![placed("x", 3), placed("y", 3)]), 8, 6).unwrap();
        assert!(output.ends_with("x y"));
    }

    #[test]
    fn test_never_glues_fragments() {
        let fragments: Vec<_> = (0..10).map(|i| placed("w", i)).collect();
        for redutor in [1, 3, 8, 100] {
            let output = format_line(&line(fragments.clone()), redutor, 0).unwrap();
            assert!(!output.contains("ww"), "glued output: {:?}", output);
            assert!(!output.ends_with(|c: char| c.is_whitespace()));
        }
    }

    #[test]
    fn test_rejects_zero_redutor() {
        assert!(matches!(
            format_line(&line(vec![placed("a", 0)]), 0, 6),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(format_line(&line(Vec::new()), 8, 6).unwrap(), "");
    }
}
