use crate::config::SelectionMethod;
use crate::engines::generation::genome::Genome;
use crate::error::{PoleBalanceError, Result};
use crate::types::FitnessRecord;
use rand::Rng;

/// Cumulative fitness table for fitness-proportional sampling
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    borders: Vec<u64>,
}

impl RouletteWheel {
    pub fn new(fitness: &FitnessRecord) -> Self {
        let borders = fitness
            .values()
            .iter()
            .scan(0u64, |sum, &f| {
                *sum += u64::from(f);
                Some(*sum)
            })
            .collect();
        Self { borders }
    }

    pub fn total(&self) -> u64 {
        self.borders.last().copied().unwrap_or(0)
    }

    /// Smallest index whose cumulative fitness exceeds a roll in `[0, total)`.
    /// With zero total fitness every index is equally likely. Panics on an
    /// empty wheel; [`Selector::new`] refuses to build one.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.total();
        if total == 0 {
            return rng.gen_range(0..self.borders.len());
        }
        let roll = rng.gen_range(0..total);
        self.borders.partition_point(|&border| border <= roll)
    }
}

/// Parent picker prepared once per generation
pub enum Selector<'a> {
    Roulette(RouletteWheel),
    Tournament {
        fitness: &'a FitnessRecord,
        size: usize,
    },
}

impl<'a> Selector<'a> {
    pub fn new(
        method: SelectionMethod,
        tournament_size: usize,
        fitness: &'a FitnessRecord,
    ) -> Result<Self> {
        if fitness.is_empty() {
            return Err(PoleBalanceError::Selection(
                "cannot select from an empty population".to_string(),
            ));
        }

        Ok(match method {
            SelectionMethod::Roulette => {
                let wheel = RouletteWheel::new(fitness);
                if wheel.total() == 0 {
                    log::debug!(
                        "All fitness values are zero, roulette falls back to uniform picks"
                    );
                }
                Selector::Roulette(wheel)
            }
            SelectionMethod::Tournament => Selector::Tournament {
                fitness,
                size: tournament_size.max(1),
            },
        })
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Selector::Roulette(wheel) => wheel.spin(rng),
            Selector::Tournament { fitness, size } => tournament_pick(fitness.values(), *size, rng),
        }
    }
}

fn tournament_pick<R: Rng + ?Sized>(fitness: &[u32], tournament_size: usize, rng: &mut R) -> usize {
    let mut best_idx = rng.gen_range(0..fitness.len());
    let mut best_fitness = fitness[best_idx];

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..fitness.len());
        if fitness[idx] > best_fitness {
            best_idx = idx;
            best_fitness = fitness[idx];
        }
    }

    best_idx
}

/// Tournament selection: index of the best of K random candidates
pub fn tournament_selection<R: Rng + ?Sized>(
    fitness: &FitnessRecord,
    tournament_size: usize,
    rng: &mut R,
) -> Result<usize> {
    Ok(Selector::new(SelectionMethod::Tournament, tournament_size, fitness)?.pick(rng))
}

/// Roulette wheel selection: probability proportional to fitness
pub fn roulette_selection<R: Rng + ?Sized>(fitness: &FitnessRecord, rng: &mut R) -> Result<usize> {
    Ok(Selector::new(SelectionMethod::Roulette, 0, fitness)?.pick(rng))
}

/// Mutation: push a gene by a random fraction of its own magnitude
///
/// `gene + rate * (±1) * m` with `m` uniform in `[0, max(1, |gene|))`,
/// truncated toward zero and clamped to `[-limit, limit]`.
pub fn mutate_gene<R: Rng + ?Sized>(gene: i32, mutation_rate: f64, limit: i32, rng: &mut R) -> i32 {
    let sign = if rng.gen::<bool>() { 1.0 } else { -1.0 };
    let magnitude = rng.gen_range(0..gene.unsigned_abs().max(1));
    let mutated = f64::from(gene) + mutation_rate * sign * f64::from(magnitude);

    let limit = f64::from(limit.max(0));
    mutated.trunc().clamp(-limit, limit) as i32
}

pub fn mutate<R: Rng + ?Sized>(genome: &mut Genome, mutation_rate: f64, limit: i32, rng: &mut R) {
    for gene in genome.genes_mut().iter_mut() {
        *gene = mutate_gene(*gene, mutation_rate, limit, rng);
    }
}

/// Generate random genome; all four gains share one random sign.
pub fn random_genome<R: Rng + ?Sized>(range: i32, rng: &mut R) -> Genome {
    let sign = if rng.gen::<bool>() { 1 } else { -1 };
    let range = range.max(1);
    Genome::new(std::array::from_fn(|_| sign * rng.gen_range(0..range)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roulette_single_nonzero_always_wins() {
        let fitness = FitnessRecord::new(vec![10, 0, 0, 0]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            assert_eq!(roulette_selection(&fitness, &mut rng).unwrap(), 0);
        }
    }

    #[test]
    fn test_roulette_never_picks_zero_fitness_when_total_positive() {
        let fitness = FitnessRecord::new(vec![0, 5, 0, 5, 0]);
        let wheel = RouletteWheel::new(&fitness);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            let idx = wheel.spin(&mut rng);
            assert!(idx == 1 || idx == 3, "picked {}", idx);
        }
    }

    #[test]
    fn test_roulette_zero_total_is_uniform_fallback() {
        let fitness = FitnessRecord::new(vec![0, 0, 0]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[roulette_selection(&fitness, &mut rng).unwrap()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_wheel_borders() {
        let wheel = RouletteWheel::new(&FitnessRecord::new(vec![3, 0, 2]));
        assert_eq!(wheel.borders, vec![3, 3, 5]);
        assert_eq!(wheel.total(), 5);
    }

    #[test]
    fn test_empty_record_is_selection_error() {
        let mut rng = StdRng::seed_from_u64(4);
        let empty = FitnessRecord::default();
        assert!(matches!(
            roulette_selection(&empty, &mut rng),
            Err(PoleBalanceError::Selection(_))
        ));
        assert!(tournament_selection(&empty, 3, &mut rng).is_err());
    }

    #[test]
    fn test_tournament_full_coverage_prefers_fittest() {
        // Sampling with replacement, so only check that a large tournament
        // almost always lands on the single best index.
        let fitness = FitnessRecord::new(vec![1, 2, 900, 3]);
        let mut rng = StdRng::seed_from_u64(5);
        let hits = (0..200)
            .filter(|_| tournament_selection(&fitness, 64, &mut rng).unwrap() == 2)
            .count();
        assert_eq!(hits, 200);
    }

    #[test]
    fn test_tournament_tie_keeps_first_seen() {
        let fitness = [7, 7, 7];
        let mut rng = StdRng::seed_from_u64(6);
        let mut replay = StdRng::seed_from_u64(6);

        let picked = tournament_pick(&fitness, 3, &mut rng);
        let first_sampled = replay.gen_range(0..fitness.len());

        assert_eq!(picked, first_sampled);
    }

    #[test]
    fn test_mutation_of_zero_gene_stays_near_zero() {
        // max(1, |0|) leaves only m = 0, so a zero gene cannot move.
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(mutate_gene(0, 0.1, 1000, &mut rng), 0);
        }
    }

    #[test]
    fn test_mutation_step_is_bounded_by_rate() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..1000 {
            let mutated = mutate_gene(500, 0.1, 1_000_000, &mut rng);
            assert!((450..=550).contains(&mutated), "{}", mutated);
        }
    }

    #[test]
    fn test_mutation_is_clamped() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let mutated = mutate_gene(1000, 5.0, 1000, &mut rng);
            assert!((-1000..=1000).contains(&mutated));
        }
        let extreme = mutate_gene(i32::MIN, 1.0, i32::MAX, &mut rng);
        assert!(extreme >= -i32::MAX);
    }

    #[test]
    fn test_random_genome_shares_sign_and_range() {
        let mut rng = StdRng::seed_from_u64(10);
        for _ in 0..200 {
            let genome = random_genome(1000, &mut rng);
            let genes = genome.genes();
            assert!(genes.iter().all(|g| g.abs() < 1000));
            assert!(genes.iter().all(|&g| g >= 0) || genes.iter().all(|&g| g <= 0));
        }
    }
}
