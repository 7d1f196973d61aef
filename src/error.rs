use thiserror::Error;

pub type TieredResult<T> = Result<T, TieredError>;

#[derive(Error, Debug)]
pub enum TieredError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Column {column} is out of range (grid width is {width})")]
    OutOfRange { column: usize, width: usize },

    #[error("Row {row}: fixed key '{key}' is empty and has no default")]
    MissingKey { row: usize, key: String },

    #[error("Row {row}, column {column}: cannot parse value '{text}'")]
    UnparsableValue {
        row: usize,
        column: usize,
        text: String,
    },

    #[error(
        "Keys [{keys}]: category '{category}' already set by column {replaced_column}, overwritten by column {column}"
    )]
    AssemblyConflict {
        keys: String,
        category: String,
        replaced_column: usize,
        column: usize,
    },
}

impl TieredError {
    /// Per-cell and per-group errors that never stop a row or sheet.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TieredError::UnparsableValue { .. } | TieredError::AssemblyConflict { .. }
        )
    }
}

/// Errors collected while processing one sheet without aborting it.
///
/// Holds recoverable errors plus row-fatal ones (`MissingKey`), in the order
/// they were encountered.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<TieredError>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: TieredError) {
        tracing::warn!("{}", error);
        self.entries.push(error);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TieredError> {
        self.entries.iter()
    }

    pub fn conflicts(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e, TieredError::AssemblyConflict { .. }))
            .count()
    }

    pub fn unparsable(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e, TieredError::UnparsableValue { .. }))
            .count()
    }

    pub fn missing_keys(&self) -> usize {
        self.iter()
            .filter(|e| matches!(e, TieredError::MissingKey { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        let unparsable = TieredError::UnparsableValue {
            row: 3,
            column: 2,
            text: "abc".to_string(),
        };
        let missing = TieredError::MissingKey {
            row: 3,
            key: "period".to_string(),
        };
        assert!(unparsable.is_recoverable());
        assert!(!missing.is_recoverable());
        assert!(!TieredError::Configuration("x".to_string()).is_recoverable());
    }

    #[test]
    fn test_diagnostics_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(TieredError::MissingKey {
            row: 1,
            key: "region".to_string(),
        });
        diagnostics.push(TieredError::AssemblyConflict {
            keys: "2020".to_string(),
            category: "Cat1".to_string(),
            replaced_column: 0,
            column: 1,
        });
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.missing_keys(), 1);
        assert_eq!(diagnostics.conflicts(), 1);
        assert_eq!(diagnostics.unparsable(), 0);
    }

    #[test]
    fn test_error_messages() {
        let err = TieredError::OutOfRange {
            column: 9,
            width: 4,
        };
        assert_eq!(
            err.to_string(),
            "Column 9 is out of range (grid width is 4)"
        );
    }
}
