use crate::engines::generation::genome::Genome;
use crate::error::{PoleBalanceError, Result};
use serde::{Deserialize, Serialize};

/// Ordered set of genomes evaluated together
pub type Population = Vec<Genome>;

/// Survival times in milliseconds, indexed like the population they came from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FitnessRecord(Vec<u32>);

impl FitnessRecord {
    pub fn new(values: Vec<u32>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&f| u64::from(f)).sum()
    }

    pub fn mean(&self) -> f64 {
        if self.0.is_empty() {
            return 0.0;
        }
        self.total() as f64 / self.0.len() as f64
    }

    /// Index and value of the highest fitness; the first index wins ties.
    pub fn best(&self) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &fitness) in self.0.iter().enumerate() {
            match best {
                Some((_, current)) if fitness <= current => {}
                _ => best = Some((i, fitness)),
            }
        }
        best
    }
}

impl From<Vec<u32>> for FitnessRecord {
    fn from(values: Vec<u32>) -> Self {
        Self(values)
    }
}

/// One evaluated generation
#[derive(Debug, Clone)]
pub struct Generation {
    index: usize,
    population: Population,
    fitness: FitnessRecord,
}

impl Generation {
    pub fn new(index: usize, population: Population, fitness: FitnessRecord) -> Result<Self> {
        if population.len() != fitness.len() {
            return Err(PoleBalanceError::PopulationMismatch {
                expected: population.len(),
                actual: fitness.len(),
            });
        }
        Ok(Self {
            index,
            population,
            fitness,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    pub fn fitness(&self) -> &FitnessRecord {
        &self.fitness
    }

    /// Best genome of this generation, first index among ties.
    pub fn best(&self) -> Option<(Genome, u32)> {
        self.fitness
            .best()
            .map(|(i, fitness)| (self.population[i], fitness))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Some genome survived the whole simulated time.
    SolutionFound,
    /// The generation budget ran out.
    GenerationLimit,
}

/// Terminal result of one optimisation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub best_genome: Genome,
    pub best_fitness: u32,
    /// Generation the reported genome was evaluated in.
    pub best_generation: usize,
    pub generations_evaluated: usize,
    pub reason: TerminationReason,
    /// Best fitness of every evaluated generation, in order.
    pub history: Vec<u32>,
}
