pub mod genome;
pub mod operators;
pub mod reproduction;
pub mod evolution_engine;
pub mod progress;

pub use genome::{Genome, GENE_COUNT};
pub use evolution_engine::EvolutionEngine;
pub use reproduction::Reproduction;
pub use operators::{RouletteWheel, Selector, roulette_selection, tournament_selection};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback, ProgressMessage,
};
