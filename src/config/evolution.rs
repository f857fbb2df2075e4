use super::traits::{invalid, ConfigSection};
use crate::error::PoleBalanceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub mutation_rate: f64,
    pub selection: SelectionMethod,
    pub tournament_size: usize,
    /// Initial gene magnitudes are drawn from `[0, initial_gene_range)`.
    pub initial_gene_range: i32,
    /// Mutation clamps every gene to `[-gene_limit, gene_limit]`.
    pub gene_limit: i32,
    pub best_policy: BestPolicy,
    pub evaluator: EvaluatorKind,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMethod {
    Roulette,
    Tournament,
}

/// Which genome a finished run reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestPolicy {
    /// Best genome of the last evaluated generation.
    FinalGeneration,
    /// Best genome seen in any generation; the earliest one wins ties.
    BestEver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluatorKind {
    Sequential,
    /// Rayon pool; `None` lets rayon pick the thread count.
    Parallel { threads: Option<usize> },
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            max_generations: 10_000,
            mutation_rate: 0.1,
            selection: SelectionMethod::Roulette,
            tournament_size: 3,
            initial_gene_range: 1000,
            gene_limit: 1_000_000_000,
            best_policy: BestPolicy::FinalGeneration,
            evaluator: EvaluatorKind::Parallel { threads: None },
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), PoleBalanceError> {
        let section = Self::section_name();

        if self.population_size == 0 {
            return Err(invalid(section, "population_size must be at least 1"));
        }
        if self.max_generations == 0 {
            return Err(invalid(section, "max_generations must be at least 1"));
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0.0 {
            return Err(invalid(
                section,
                format!(
                    "mutation_rate must be finite and non-negative, got {}",
                    self.mutation_rate
                ),
            ));
        }
        if self.tournament_size == 0 || self.tournament_size >= self.population_size {
            return Err(invalid(
                section,
                format!(
                    "tournament_size must be in 1..{}, got {}",
                    self.population_size, self.tournament_size
                ),
            ));
        }
        if self.initial_gene_range <= 0 {
            return Err(invalid(section, "initial_gene_range must be positive"));
        }
        if self.gene_limit < self.initial_gene_range {
            return Err(invalid(
                section,
                "gene_limit must be at least initial_gene_range",
            ));
        }
        if let EvaluatorKind::Parallel { threads: Some(0) } = self.evaluator {
            return Err(invalid(section, "parallel evaluator needs at least one thread"));
        }
        Ok(())
    }
}
