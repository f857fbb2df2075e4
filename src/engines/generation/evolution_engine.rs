use crate::config::{AppConfig, BestPolicy, ConfigSection, EvolutionConfig};
use crate::engines::evaluation::{build_evaluator, FitnessEvaluator};
use crate::engines::generation::{
    genome::Genome,
    operators::random_genome,
    progress::ProgressCallback,
    reproduction::Reproduction,
};
use crate::engines::simulation::PhysicsModel;
use crate::error::{PoleBalanceError, Result};
use crate::types::{Generation, Population, RunOutcome, TerminationReason};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generation loop: evaluate, check termination, reproduce
///
/// The engine owns its evaluator for its whole lifetime. A parallel evaluator
/// therefore keeps one thread pool across every generation of every run made
/// through this engine, and releases it when the engine is dropped.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    evaluator: Box<dyn FitnessEvaluator>,
    reproduction: Reproduction,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig, evaluator: Box<dyn FitnessEvaluator>) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let reproduction = Reproduction::from_config(&config);

        Ok(Self {
            config,
            evaluator,
            reproduction,
            rng,
        })
    }

    /// Builds the physics model and the configured evaluator, then the engine.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let model = PhysicsModel::new(config.physics.clone())?;
        let evaluator = build_evaluator(config.evolution.evaluator, model)?;
        Self::new(config.evolution.clone(), evaluator)
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &dyn FitnessEvaluator {
        self.evaluator.as_ref()
    }

    /// Run the evolution process from a random initial population
    pub fn run<C: ProgressCallback>(&mut self, callback: C) -> Result<RunOutcome> {
        let population = self.initialize_population();
        self.run_from(population, callback)
    }

    /// Run the evolution process from a caller-supplied initial population
    pub fn run_from<C: ProgressCallback>(
        &mut self,
        initial: Population,
        mut callback: C,
    ) -> Result<RunOutcome> {
        if initial.len() != self.config.population_size {
            return Err(PoleBalanceError::PopulationMismatch {
                expected: self.config.population_size,
                actual: initial.len(),
            });
        }

        let time_total = self.evaluator.model().config().time_total_ms;
        log::info!(
            "Starting run: {} genomes, at most {} generations, {} evaluator",
            self.config.population_size,
            self.config.max_generations,
            self.evaluator.name()
        );

        let mut population = initial;
        let mut history = Vec::new();
        let mut best_ever: Option<(Genome, u32, usize)> = None;
        let mut index = 0;

        loop {
            callback.on_generation_start(index);

            let fitness = self.evaluator.evaluate(&population)?;
            let generation = Generation::new(index, population, fitness)?;
            let (best_genome, best_fitness) = generation
                .best()
                .ok_or_else(|| PoleBalanceError::Selection("empty population".to_string()))?;

            history.push(best_fitness);
            if best_ever.map_or(true, |(_, fitness, _)| best_fitness > fitness) {
                best_ever = Some((best_genome, best_fitness, index));
            }

            let mean_fitness = generation.fitness().mean();
            log::debug!(
                "Generation {}: best {} ms, mean {:.1} ms",
                generation.index(),
                best_fitness,
                mean_fitness
            );
            callback.on_generation_complete(generation.index(), best_fitness, mean_fitness);

            if let Some(reason) = self.termination(index + 1, best_fitness, time_total) {
                let (genome, fitness, found_in) = match self.config.best_policy {
                    BestPolicy::FinalGeneration => (best_genome, best_fitness, index),
                    BestPolicy::BestEver => best_ever.unwrap_or((best_genome, best_fitness, index)),
                };
                let outcome = RunOutcome {
                    best_genome: genome,
                    best_fitness: fitness,
                    best_generation: found_in,
                    generations_evaluated: index + 1,
                    reason,
                    history,
                };

                log::info!(
                    "Run terminated ({:?}) after {} generations: best {} ms {}",
                    outcome.reason,
                    outcome.generations_evaluated,
                    outcome.best_fitness,
                    outcome.best_genome
                );
                callback.on_run_complete(&outcome);
                return Ok(outcome);
            }

            population = self.reproduction.next_population(
                generation.population(),
                generation.fitness(),
                &mut self.rng,
            )?;
            index += 1;
        }
    }

    fn termination(
        &self,
        generations_evaluated: usize,
        best_fitness: u32,
        time_total: u32,
    ) -> Option<TerminationReason> {
        if best_fitness >= time_total {
            Some(TerminationReason::SolutionFound)
        } else if generations_evaluated >= self.config.max_generations {
            Some(TerminationReason::GenerationLimit)
        } else {
            None
        }
    }

    fn initialize_population(&mut self) -> Population {
        (0..self.config.population_size)
            .map(|_| random_genome(self.config.initial_gene_range, &mut self.rng))
            .collect()
    }
}
