//! benchcheck - statistical comparison of repeated benchmark runs
//!
//! This library turns the raw output of benchmark runs of an old and a new
//! revision into per-metric, per-operation deltas that are only reported
//! when they are statistically significant, and evaluates pass/fail
//! threshold checks against them.
//!
//! ```
//! use benchcheck::checker::Checker;
//! use benchcheck::stat::{stat, StatConfig};
//!
//! let old = ["BenchmarkParse 1000 1000 ns/op"; 5];
//! let new = ["BenchmarkParse 1000 1000 ns/op"; 5];
//!
//! let results = stat(&old, &new, &StatConfig::default()).unwrap();
//! let check = Checker::parse("time/op=+10%").unwrap();
//! assert!(results.iter().all(|r| check.check(r)));
//! ```

pub mod aggregate;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod runner;
pub mod stat;

pub use error::{Error, Result};
