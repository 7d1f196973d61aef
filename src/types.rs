use serde::Serialize;

//==============================================================================
// Cell Grid
//==============================================================================

/// A raw scalar cell as read from a worksheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Render the cell as a label, `None` when blank.
    ///
    /// Whole numbers drop their fractional part so a year header reads "2020".
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => Some(format_number(*n)),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Number(f64::from(n))
    }
}

/// Format a number for display, removing the fractional part of whole numbers
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Fully materialized rows × columns of cells, 0-indexed on both axes.
///
/// Rows may be ragged; reads past a row's end return [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellGrid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl CellGrid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |r| r.iter().all(Cell::is_blank))
    }
}

//==============================================================================
// Hierarchy Labels
//==============================================================================

/// A resolved label at one hierarchy level
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryLabel {
    /// A label stated in the header (directly or via a merged span)
    Named(String),
    /// Level-0 category for columns with no top-level label
    Unknown,
    /// The level does not apply to this column or record
    NotApplicable,
}

impl CategoryLabel {
    pub fn is_not_applicable(&self) -> bool {
        matches!(self, CategoryLabel::NotApplicable)
    }

    /// Text form, using the given names for the two placeholders
    pub fn render<'a>(&'a self, unknown_label: &'a str, na_marker: &'a str) -> &'a str {
        match self {
            CategoryLabel::Named(s) => s,
            CategoryLabel::Unknown => unknown_label,
            CategoryLabel::NotApplicable => na_marker,
        }
    }
}

/// One step of a column's hierarchy path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LevelLabel {
    pub level: usize,
    pub label: CategoryLabel,
}

/// Inclusive column range of a contiguous run sharing one level-0 label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnSpan {
    pub first: usize,
    pub last: usize,
}

impl ColumnSpan {
    pub fn contains(&self, column: usize) -> bool {
        (self.first..=self.last).contains(&column)
    }

    pub fn width(&self) -> usize {
        self.last - self.first + 1
    }
}

/// A level-0 span together with the category it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpan {
    pub category: CategoryLabel,
    pub span: ColumnSpan,
}

/// Classification of a single data column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub column_index: usize,
    /// One entry per configured level, level 0 first
    pub path: Vec<LevelLabel>,
    pub level0_span: ColumnSpan,
}

impl ColumnDescriptor {
    pub fn level0(&self) -> &CategoryLabel {
        &self.path[0].label
    }
}

/// Column descriptors plus the dataset-wide level-0 schema of one sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub descriptors: Vec<ColumnDescriptor>,
    pub spans: Vec<CategorySpan>,
    /// Distinct level-0 categories in first-seen column order
    pub categories: Vec<CategoryLabel>,
}

impl Classification {
    pub fn category_index(&self, category: &CategoryLabel) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }
}

//==============================================================================
// Records
//==============================================================================

/// An accepted value cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Observation {
    Number(f64),
    /// A recognized non-numeric placeholder such as "x" or "-"
    Placeholder(String),
}

/// One (data row × column descriptor) pair that passed the emission policy
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedRecord {
    pub row_index: usize,
    pub column_index: usize,
    /// Fixed key values in configured key order
    pub keys: Vec<String>,
    pub path: Vec<LevelLabel>,
    pub value: Observation,
}

impl ExpandedRecord {
    pub fn level0(&self) -> &CategoryLabel {
        &self.path[0].label
    }
}

/// Where a NotApplicable wide cell came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NaSource {
    /// The contributing column has no label below level 0
    Classification,
    /// The row had no value under this category
    NoContribution,
}

/// The value of one level-0 category column in a wide row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideCell {
    pub label: CategoryLabel,
    pub value: Option<Observation>,
    pub na_source: Option<NaSource>,
    /// Column that supplied the label, if any
    pub source_column: Option<usize>,
}

impl WideCell {
    pub fn not_applicable() -> Self {
        Self {
            label: CategoryLabel::NotApplicable,
            value: None,
            na_source: Some(NaSource::NoContribution),
            source_column: None,
        }
    }
}

/// One row per distinct key combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideRecord {
    pub keys: Vec<String>,
    /// Aligned with [`WideTable::categories`]
    pub cells: Vec<WideCell>,
}

/// Wide output of one sheet with its stable column schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideTable {
    pub key_names: Vec<String>,
    pub categories: Vec<CategoryLabel>,
    pub rows: Vec<WideRecord>,
}

//==============================================================================
// Flat tables (serialization layer)
//==============================================================================

/// A scalar in a flat output table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlatValue {
    Text(String),
    Number(f64),
    Null,
}

/// Header plus rows, ready for tabular serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatTable {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<FlatValue>>,
}
