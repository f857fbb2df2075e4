pub mod config;
pub mod engines;
pub mod error;
pub mod types;

pub use error::{PoleBalanceError, Result};
pub use types::{FitnessRecord, Generation, Population, RunOutcome, TerminationReason};
