use polebalance::config::{
    AppConfig, BestPolicy, EvaluatorKind, EvolutionConfig, PhysicsConfig, SelectionMethod,
};
use polebalance::engines::evaluation::{ParallelEvaluator, SequentialEvaluator};
use polebalance::engines::generation::{
    ChannelProgressCallback, EvolutionEngine, Genome, ProgressCallback, ProgressMessage,
};
use polebalance::engines::simulation::PhysicsModel;
use polebalance::TerminationReason;
use std::sync::mpsc::channel;

/// Simple progress callback for testing
struct TestProgressCallback {
    started: Vec<usize>,
    best: Vec<u32>,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        self.started.push(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: u32, mean_fitness: f64) {
        self.best.push(best_fitness);
        println!(
            "Generation {}: Best Fitness = {}, Mean = {:.1}",
            generation, best_fitness, mean_fitness
        );
    }
}

/// Create a minimal evolution config for fast testing
fn create_test_evolution_config(seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        population_size: 40,
        max_generations: 30,
        mutation_rate: 0.1,
        selection: SelectionMethod::Roulette,
        tournament_size: 3,
        evaluator: EvaluatorKind::Sequential,
        seed: Some(seed),
        ..EvolutionConfig::default()
    }
}

fn sequential_engine(config: EvolutionConfig) -> EvolutionEngine {
    let model = PhysicsModel::new(PhysicsConfig::default()).unwrap();
    EvolutionEngine::new(config, Box::new(SequentialEvaluator::new(model))).unwrap()
}

#[test]
fn test_best_fitness_never_decreases_with_elitism() {
    for seed in [1, 2, 3] {
        let mut engine = sequential_engine(create_test_evolution_config(seed));
        let mut callback = TestProgressCallback {
            started: Vec::new(),
            best: Vec::new(),
        };

        let outcome = engine.run(&mut callback).unwrap();

        assert_eq!(callback.best, outcome.history);
        assert!(
            outcome.history.windows(2).all(|w| w[0] <= w[1]),
            "seed {}: {:?}",
            seed,
            outcome.history
        );
    }
}

#[test]
fn test_termination_policy() {
    for seed in [4, 5, 6, 7] {
        let config = create_test_evolution_config(seed);
        let max_generations = config.max_generations;
        let mut engine = sequential_engine(config);

        let outcome = engine.run(()).unwrap();

        assert!(outcome.generations_evaluated <= max_generations);
        assert_eq!(outcome.history.len(), outcome.generations_evaluated);
        match outcome.reason {
            TerminationReason::SolutionFound => {
                assert_eq!(outcome.best_fitness, 60_000);
                // Nothing reached the full time before the last generation.
                let earlier = &outcome.history[..outcome.history.len() - 1];
                assert!(earlier.iter().all(|&f| f < 60_000));
            }
            TerminationReason::GenerationLimit => {
                assert_eq!(outcome.generations_evaluated, max_generations);
                assert!(outcome.history.iter().all(|&f| f < 60_000));
            }
        }
    }
}

#[test]
fn test_same_seed_same_run() {
    let first = sequential_engine(create_test_evolution_config(42))
        .run(())
        .unwrap();
    let second = sequential_engine(create_test_evolution_config(42))
        .run(())
        .unwrap();

    assert_eq!(first.history, second.history);
    assert_eq!(first.best_genome, second.best_genome);
}

#[test]
fn test_parallel_engine_matches_sequential_engine() {
    let config = create_test_evolution_config(99);
    let model = PhysicsModel::new(PhysicsConfig::default()).unwrap();

    let sequential = sequential_engine(config.clone()).run(()).unwrap();
    let parallel = EvolutionEngine::new(
        config,
        Box::new(ParallelEvaluator::new(model, Some(4)).unwrap()),
    )
    .unwrap()
    .run(())
    .unwrap();

    assert_eq!(sequential.history, parallel.history);
    assert_eq!(sequential.best_genome, parallel.best_genome);
    assert_eq!(sequential.reason, parallel.reason);
}

#[test]
fn test_tournament_selection_run() {
    let config = EvolutionConfig {
        selection: SelectionMethod::Tournament,
        tournament_size: 5,
        ..create_test_evolution_config(8)
    };
    let outcome = sequential_engine(config).run(()).unwrap();

    assert!(outcome.history.windows(2).all(|w| w[0] <= w[1]));
    assert!(outcome.best_fitness % 25 == 0);
}

#[test]
fn test_best_ever_policy_reports_earliest_maximum() {
    let config = EvolutionConfig {
        population_size: 4,
        max_generations: 3,
        best_policy: BestPolicy::BestEver,
        ..create_test_evolution_config(9)
    };
    let mut engine = sequential_engine(config);
    // Genes this small never change, so every generation scores the same.
    let initial = vec![
        Genome::new([0, 0, -1, 0]),
        Genome::new([1, 1, 1, 1]),
        Genome::new([1, 1, 1, 1]),
        Genome::new([1, 1, 1, 1]),
    ];

    let outcome = engine.run_from(initial, ()).unwrap();

    assert_eq!(outcome.best_fitness, 7700);
    assert_eq!(outcome.best_genome, Genome::new([0, 0, -1, 0]));
    assert_eq!(outcome.best_generation, 0);
    assert_eq!(outcome.generations_evaluated, 3);
}

#[test]
fn test_channel_progress_reports_every_generation() {
    let (tx, rx) = channel();
    let config = EvolutionConfig {
        population_size: 4,
        max_generations: 2,
        ..create_test_evolution_config(10)
    };
    let mut engine = sequential_engine(config);

    engine
        .run_from(
            vec![Genome::new([1, 1, 1, 1]); 4],
            ChannelProgressCallback::new(tx),
        )
        .unwrap();
    let messages: Vec<ProgressMessage> = rx.try_iter().collect();

    assert_eq!(
        messages,
        vec![
            ProgressMessage::GenerationStart(0),
            ProgressMessage::GenerationComplete {
                generation: 0,
                best_fitness: 200,
                mean_fitness: 200.0,
            },
            ProgressMessage::GenerationStart(1),
            ProgressMessage::GenerationComplete {
                generation: 1,
                best_fitness: 200,
                mean_fitness: 200.0,
            },
            ProgressMessage::RunComplete {
                best_fitness: 200,
                generations_evaluated: 2,
            },
        ]
    );
}

#[test]
fn test_engine_from_app_config() {
    let config = AppConfig::from_toml_str(
        r#"
        [evolution]
        population_size = 10
        max_generations = 5
        seed = 3

        [evolution.evaluator.Parallel]
        threads = 2
        "#,
    )
    .unwrap();

    let mut engine = EvolutionEngine::from_config(&config).unwrap();
    assert_eq!(engine.evaluator().name(), "parallel");

    let outcome = engine.run(()).unwrap();
    assert!(outcome.generations_evaluated <= 5);
}
