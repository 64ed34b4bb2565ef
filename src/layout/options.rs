//! Grid shape and spacing options.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of grid rows per page.
pub const DEFAULT_NUM_ROWS: usize = 35;
/// Default number of grid columns per page.
pub const DEFAULT_NUM_COLUMNS: usize = 20;
/// Default tab desensitizer.
pub const DEFAULT_SPACE_REDUTOR: usize = 8;
/// Default large-glyph compensation.
pub const DEFAULT_FONT_SIZE_REGULATOR: usize = 6;

/// Options that shape the virtual grid and the tab spacing of a page.
///
/// Deserializes with defaults for missing fields, so a config file only needs
/// the knobs it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Row-grid resolution (y axis)
    pub num_rows: usize,

    /// Column-grid resolution (x axis)
    pub num_columns: usize,

    /// Divisor applied to gaps before they become tabs; higher means fewer tabs
    pub space_redutor: usize,

    /// Spacing boost for large glyphs; higher means sparser lines
    pub font_size_regulator: usize,

    /// Indent the first fragment of each line by its column
    pub indent_first: bool,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of rows.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.num_rows = rows;
        self
    }

    /// Set the number of columns.
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.num_columns = columns;
        self
    }

    /// Set the space reductor.
    pub fn with_space_redutor(mut self, redutor: usize) -> Self {
        self.space_redutor = redutor;
        self
    }

    /// Set the font size regulator.
    pub fn with_font_size_regulator(mut self, regulator: usize) -> Self {
        self.font_size_regulator = regulator;
        self
    }

    /// Enable or disable first-fragment indentation.
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent_first = indent;
        self
    }

    /// Check the shape parameters.
    pub fn validate(&self) -> Result<()> {
        if self.num_rows == 0 {
            return Err(Error::Configuration("num_rows must be at least 1".into()));
        }
        if self.num_columns == 0 {
            return Err(Error::Configuration(
                "num_columns must be at least 1".into(),
            ));
        }
        if self.space_redutor == 0 {
            return Err(Error::Configuration(
                "space_redutor must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Load options from JSON, falling back to defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            num_rows: DEFAULT_NUM_ROWS,
            num_columns: DEFAULT_NUM_COLUMNS,
            space_redutor: DEFAULT_SPACE_REDUTOR,
            font_size_regulator: DEFAULT_FONT_SIZE_REGULATOR,
            indent_first: true,
        }
    }
}
