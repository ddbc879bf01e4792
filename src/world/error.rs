//! Error types for data loading.

use thiserror::Error;

/// Errors that can occur when loading level or enemy data.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },

    /// A value parsed fine but is out of range.
    #[error("Invalid value for '{field}': {details}")]
    InvalidValue { field: String, details: String },

    /// A level places an enemy type that has no definition.
    #[error("Level '{level}' references unknown enemy type '{enemy_type}'")]
    UnknownEnemyType { level: String, enemy_type: String },
}
