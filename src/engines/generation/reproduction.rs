use crate::config::{EvolutionConfig, SelectionMethod};
use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::{mutate, Selector};
use crate::error::{PoleBalanceError, Result};
use crate::types::{FitnessRecord, Population};
use rand::Rng;

/// Builds the next population from an evaluated one
///
/// Slot 0 receives the best genome unchanged. Every other slot gets a child
/// whose cart gains come from one selected parent and whose pole gains come
/// from another, after which each gene is mutated.
#[derive(Debug, Clone)]
pub struct Reproduction {
    pub selection: SelectionMethod,
    pub tournament_size: usize,
    pub mutation_rate: f64,
    pub gene_limit: i32,
}

impl Reproduction {
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self {
            selection: config.selection,
            tournament_size: config.tournament_size,
            mutation_rate: config.mutation_rate,
            gene_limit: config.gene_limit,
        }
    }

    pub fn next_population<R: Rng + ?Sized>(
        &self,
        population: &[Genome],
        fitness: &FitnessRecord,
        rng: &mut R,
    ) -> Result<Population> {
        if population.len() != fitness.len() {
            return Err(PoleBalanceError::PopulationMismatch {
                expected: population.len(),
                actual: fitness.len(),
            });
        }

        let selector = Selector::new(self.selection, self.tournament_size, fitness)?;
        let (elite_idx, _) = fitness
            .best()
            .ok_or_else(|| PoleBalanceError::Selection("empty population".to_string()))?;

        let mut next = Vec::with_capacity(population.len());
        next.push(population[elite_idx]);

        while next.len() < population.len() {
            let cart_parent = selector.pick(rng);
            let pole_parent = selector.pick(rng);

            let mut child = Genome::crossover(&population[cart_parent], &population[pole_parent]);
            mutate(&mut child, self.mutation_rate, self.gene_limit, rng);
            next.push(child);
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reproduction(selection: SelectionMethod) -> Reproduction {
        Reproduction {
            selection,
            tournament_size: 2,
            mutation_rate: 0.1,
            gene_limit: 1_000_000,
        }
    }

    fn sample() -> (Vec<Genome>, FitnessRecord) {
        let population = vec![
            Genome::new([10, 20, 30, 40]),
            Genome::new([-500, 250, -125, 60]),
            Genome::new([7, -7, 7, -7]),
            Genome::new([999, 0, -999, 1]),
        ];
        (population, FitnessRecord::new(vec![100, 2500, 2500, 0]))
    }

    #[test]
    fn test_elite_copied_to_slot_zero() {
        let (population, fitness) = sample();
        let mut rng = StdRng::seed_from_u64(11);

        for method in [SelectionMethod::Roulette, SelectionMethod::Tournament] {
            let next = reproduction(method)
                .next_population(&population, &fitness, &mut rng)
                .unwrap();

            assert_eq!(next.len(), population.len());
            // Index 1 and 2 tie; the first one is the elite.
            assert_eq!(next[0], population[1]);
        }
    }

    #[test]
    fn test_without_mutation_children_are_block_crossovers() {
        let (population, fitness) = sample();
        let mut rng = StdRng::seed_from_u64(12);
        let reproduction = Reproduction {
            mutation_rate: 0.0,
            ..reproduction(SelectionMethod::Roulette)
        };

        let next = reproduction
            .next_population(&population, &fitness, &mut rng)
            .unwrap();

        for child in &next[1..] {
            let genes = child.genes();
            assert!(population
                .iter()
                .any(|p| p.genes()[0..2] == genes[0..2]));
            assert!(population
                .iter()
                .any(|p| p.genes()[2..4] == genes[2..4]));
            // Roulette never picks the zero-fitness genome.
            assert_ne!(genes[0], 999);
            assert_ne!(genes[3], 1);
        }
    }

    #[test]
    fn test_mismatched_inputs_rejected() {
        let (population, _) = sample();
        let mut rng = StdRng::seed_from_u64(13);
        let result = reproduction(SelectionMethod::Roulette).next_population(
            &population,
            &FitnessRecord::new(vec![1, 2]),
            &mut rng,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_single_genome_population() {
        let population = vec![Genome::new([1, 2, 3, 4])];
        let fitness = FitnessRecord::new(vec![0]);
        let mut rng = StdRng::seed_from_u64(14);

        let next = reproduction(SelectionMethod::Roulette)
            .next_population(&population, &fitness, &mut rng)
            .unwrap();

        assert_eq!(next, population);
    }
}
