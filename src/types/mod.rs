//! Type definitions for the fraud scoring service

pub mod transaction;
pub mod verdict;

pub use transaction::{Channel, ScoreRequest, TransactionInput};
pub use verdict::{Prediction, ScoreFailure, Verdict, VerdictRecord};
