use crate::core::types::{FarmId, Year};
use crate::decision::strategy::Strategy;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{farm}: reference income is zero, satisfaction is undefined")]
    DegenerateReference { farm: FarmId },

    #[error("population trend undefined in year {year}: division by zero mean ({detail})")]
    DegenerateTrend { year: Year, detail: String },

    #[error("{farm}: {strategy:?} produced an empty candidate set")]
    NoViableActivity { farm: FarmId, strategy: Strategy },

    #[error("solver results reference unknown farm {0}")]
    UnknownFarm(FarmId),

    #[error("solver results omit {0}")]
    MissingSolverResult(FarmId),

    #[error("{farm}: income history has {actual} entries, memory length is {expected}")]
    InconsistentMemory {
        farm: FarmId,
        actual: usize,
        expected: usize,
    },

    #[error("activity '{0}' is not in the master catalog")]
    UnknownActivity(String),

    #[error("{farm}: matrix row has {actual} columns, header has {expected}")]
    MalformedMatrixRow {
        farm: FarmId,
        actual: usize,
        expected: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
