//! Error types for combat data loading.

use thiserror::Error;

/// Errors that can occur when loading or validating the data tables.
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

    /// A record names another record that does not exist.
    #[error("{table} record '{record}' references unknown '{reference}'")]
    UnknownReference {
        table: &'static str,
        record: String,
        reference: String,
    },

    /// A numeric field is outside its valid range.
    #[error("Invalid value in '{record}': {details}")]
    InvalidValue { record: String, details: String },
}

/// Errors from spawning an enemy or a companion.
#[derive(Debug, Error, PartialEq)]
pub enum SpawnError {
    #[error("Unknown enemy type: {0}")]
    UnknownEnemyType(String),

    #[error("Unknown companion type: {0}")]
    UnknownCompanionType(String),

    #[error("Invalid health override {value} for '{enemy_type}'")]
    InvalidHealth { enemy_type: String, value: f32 },
}
