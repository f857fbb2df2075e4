pub mod evaluator;
pub mod parallel;

pub use evaluator::{build_evaluator, FitnessEvaluator, SequentialEvaluator};
pub use parallel::ParallelEvaluator;
