//! Error types
//!
//! Only level loading and settings loading can fail. Everything else in the
//! simulation degrades to defined sentinels (out-of-bounds terrain is
//! concrete, out-of-bounds occupancy is empty).

use thiserror::Error;

/// Fatal level data errors: the field cannot be built without a full grid
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("incomplete level: expected {expected} rows, found {found}")]
    TooFewRows { expected: usize, found: usize },
    #[error("incomplete line {row}: expected {expected} symbols, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown level symbol {symbol:?} at column {col}, row {row}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

/// Settings loading and validation errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
}
