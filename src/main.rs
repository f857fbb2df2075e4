use anyhow::Context;
use polebalance::config::ConfigManager;
use polebalance::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "polebalance.toml";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Settings come from the file named by POLEBALANCE_CONFIG (optional) and
    // POLEBALANCE_<SECTION>__<KEY> overrides.
    let config_path = std::env::var_os("POLEBALANCE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let manager = ConfigManager::new();
    manager
        .load_layered(Some(config_path.as_path()))
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    let config = manager.get();

    let mut engine = EvolutionEngine::from_config(&config)?;
    let outcome = engine.run(ConsoleProgressCallback::default())?;

    println!(
        "Solution:\n\tfitness = {}\n\tc1 = {}\n\tc2 = {}\n\tc3 = {}\n\tc4 = {}",
        outcome.best_fitness,
        outcome.best_genome.position_gain(),
        outcome.best_genome.velocity_gain(),
        outcome.best_genome.angle_gain(),
        outcome.best_genome.angular_velocity_gain()
    );

    if let Some(dir) = std::env::var_os("POLEBALANCE_EXPORT_DIR") {
        let dir = PathBuf::from(dir);
        let trajectory = engine.evaluator().model().trace(&outcome.best_genome);
        let summary = trajectory.summary(Some(outcome.best_generation), &config.physics);

        trajectory.write_table(create(&dir.join("data.txt"))?)?;
        summary.write_table(create(&dir.join("header.txt"))?)?;
        log::info!("Trajectory written to {}", dir.display());
    }

    Ok(())
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}
