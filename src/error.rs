//! Error types for the statistics engine and its collaborators

use crate::checker::CheckerError;
use crate::runner::CmdError;
use thiserror::Error;

/// Errors surfaced by the benchcheck library
///
/// Malformed record lines and benchmarks present on only one side are not
/// errors; they are skipped by the parser and aggregator respectively.
#[derive(Error, Debug)]
pub enum Error {
    /// A checker rule supplied by the user could not be parsed
    #[error(transparent)]
    Checker(#[from] CheckerError),

    /// An external command (fetch or benchmark run) failed
    #[error(transparent)]
    Command(#[from] CmdError),

    /// Statistical configuration is out of range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Aggregation produced a group the engine cannot have received from
    /// a correct pipeline (e.g. a group with an empty side)
    #[error("Internal consistency fault: {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, Error>;
