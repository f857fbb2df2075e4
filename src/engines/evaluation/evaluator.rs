use crate::config::EvaluatorKind;
use crate::engines::evaluation::parallel::ParallelEvaluator;
use crate::engines::generation::genome::Genome;
use crate::engines::simulation::PhysicsModel;
use crate::error::{PoleBalanceError, Result};
use crate::types::FitnessRecord;

/// Scores a whole population; the returned record is indexed like `population`.
///
/// Every implementation must return exactly the values the sequential
/// evaluator returns for the same population and physics.
pub trait FitnessEvaluator: Send {
    fn name(&self) -> &str;

    fn model(&self) -> &PhysicsModel;

    fn evaluate(&self, population: &[Genome]) -> Result<FitnessRecord>;
}

/// One genome after another on the calling thread
pub struct SequentialEvaluator {
    model: PhysicsModel,
}

impl SequentialEvaluator {
    pub fn new(model: PhysicsModel) -> Self {
        Self { model }
    }
}

impl FitnessEvaluator for SequentialEvaluator {
    fn name(&self) -> &str {
        "sequential"
    }

    fn model(&self) -> &PhysicsModel {
        &self.model
    }

    fn evaluate(&self, population: &[Genome]) -> Result<FitnessRecord> {
        let values = population
            .iter()
            .map(|genome| self.model.evaluate(genome))
            .collect();
        Ok(FitnessRecord::new(values))
    }
}

/// Creates the evaluator named by the config. A parallel evaluator owns its
/// thread pool, which is released when the evaluator is dropped.
pub fn build_evaluator(
    kind: EvaluatorKind,
    model: PhysicsModel,
) -> Result<Box<dyn FitnessEvaluator>> {
    match kind {
        EvaluatorKind::Sequential => Ok(Box::new(SequentialEvaluator::new(model))),
        EvaluatorKind::Parallel { threads } => {
            Ok(Box::new(ParallelEvaluator::new(model, threads)?))
        }
    }
}

pub(crate) fn check_aligned(population: &[Genome], record: &FitnessRecord) -> Result<()> {
    if record.len() != population.len() {
        return Err(PoleBalanceError::PopulationMismatch {
            expected: population.len(),
            actual: record.len(),
        });
    }
    Ok(())
}
