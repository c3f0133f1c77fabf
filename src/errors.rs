use std::error::Error;

use thiserror::Error as ThisError;

use crate::instance::{City, NumCities};

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> std::result::Result<(), E>;
}

#[derive(Debug, ThisError)]
pub enum TspError {
    #[error("distance matrix is empty")]
    EmptyMatrix,
    #[error("distance matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("negative distance {value} from city {from} to city {to}")]
    NegativeDistance { from: City, to: City, value: i64 },
    #[error("distance {value} from city {from} to city {to} exceeds the supported maximum")]
    DistanceTooLarge { from: City, to: City, value: i64 },
    #[error("distance from city {city} to itself is {value}, expected 0")]
    NonZeroDiagonal { city: City, value: i64 },
    #[error("{cities} cities exceed the maximum of {max} supported by the visited-set width")]
    TooManyCities { cities: usize, max: NumCities },
    #[error("start city {start} is out of range for {cities} cities")]
    StartOutOfRange { start: City, cities: NumCities },
    #[error(
        "state table for {cities} cities needs {required_bytes} bytes, budget is {budget_bytes} bytes"
    )]
    StateSpaceTooLarge {
        cities: NumCities,
        required_bytes: usize,
        budget_bytes: usize,
    },
    #[error("brute force is limited to {max} cities, instance has {cities}")]
    TooLargeForBruteForce { cities: NumCities, max: NumCities },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, TspError>;

impl TspError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Returns true for all errors raised while validating an instance before solving it.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyMatrix
                | Self::NotSquare { .. }
                | Self::NegativeDistance { .. }
                | Self::DistanceTooLarge { .. }
                | Self::NonZeroDiagonal { .. }
                | Self::TooManyCities { .. }
                | Self::StartOutOfRange { .. }
                | Self::StateSpaceTooLarge { .. }
                | Self::TooLargeForBruteForce { .. }
        )
    }
}
