use crate::engines::evaluation::evaluator::{check_aligned, FitnessEvaluator};
use crate::engines::generation::genome::Genome;
use crate::engines::simulation::PhysicsModel;
use crate::error::{PoleBalanceError, Result};
use crate::types::FitnessRecord;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::panic::{self, AssertUnwindSafe};

/// Batch evaluator backed by a dedicated rayon pool
///
/// The pool is built once in [`ParallelEvaluator::new`] and lives exactly as
/// long as the evaluator. Nothing is shared through rayon's global pool, so two
/// runs in one process never see each other's workers.
pub struct ParallelEvaluator {
    model: PhysicsModel,
    pool: ThreadPool,
}

impl ParallelEvaluator {
    pub fn new(model: PhysicsModel, threads: Option<usize>) -> Result<Self> {
        let mut builder =
            ThreadPoolBuilder::new().thread_name(|i| format!("polebalance-eval-{}", i));
        if let Some(threads) = threads {
            if threads == 0 {
                return Err(PoleBalanceError::Backend(
                    "thread count must be at least 1".to_string(),
                ));
            }
            builder = builder.num_threads(threads);
        }

        let pool = builder
            .build()
            .map_err(|e| PoleBalanceError::Backend(format!("Failed to start thread pool: {}", e)))?;

        log::info!(
            "Parallel evaluator ready with {} worker threads",
            pool.current_num_threads()
        );

        Ok(Self { model, pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl FitnessEvaluator for ParallelEvaluator {
    fn name(&self) -> &str {
        "parallel"
    }

    fn model(&self) -> &PhysicsModel {
        &self.model
    }

    fn evaluate(&self, population: &[Genome]) -> Result<FitnessRecord> {
        let model = &self.model;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                population
                    .par_iter()
                    .map(|genome| model.evaluate(genome))
                    .collect::<Vec<u32>>()
            })
        }));

        let values = outcome
            .map_err(|_| PoleBalanceError::Backend("a fitness worker panicked".to_string()))?;
        let record = FitnessRecord::new(values);
        check_aligned(population, &record)?;
        Ok(record)
    }
}

impl Drop for ParallelEvaluator {
    fn drop(&mut self) {
        log::debug!("Releasing parallel evaluator ({} threads)", self.num_threads());
    }
}
