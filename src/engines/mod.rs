pub mod simulation;
pub mod evaluation;
pub mod generation;
