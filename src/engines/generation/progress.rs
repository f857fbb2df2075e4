use crate::types::RunOutcome;
use std::sync::mpsc::Sender;

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best_fitness: u32, mean_fitness: f64);
    fn on_run_complete(&mut self, _outcome: &RunOutcome) {}
}

/// Silent callback
impl ProgressCallback for () {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(
        &mut self,
        _generation: usize,
        _best_fitness: u32,
        _mean_fitness: f64,
    ) {
    }
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: u32, mean_fitness: f64) {
        (**self).on_generation_complete(generation, best_fitness, mean_fitness);
    }

    fn on_run_complete(&mut self, outcome: &RunOutcome) {
        (**self).on_run_complete(outcome);
    }
}

/// Logs one line every `every` generations, plus the final one.
pub struct ConsoleProgressCallback {
    every: usize,
    last_best: u32,
}

impl ConsoleProgressCallback {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            last_best: 0,
        }
    }
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, best_fitness: u32, mean_fitness: f64) {
        let improved = best_fitness > self.last_best;
        self.last_best = best_fitness;
        if generation % self.every == 0 || improved {
            log::info!(
                "Generation {}: best {} ms, mean {:.1} ms{}",
                generation,
                best_fitness,
                mean_fitness,
                if improved { " (improved)" } else { "" }
            );
        }
    }

    fn on_run_complete(&mut self, outcome: &RunOutcome) {
        log::info!(
            "Run finished after {} generations ({:?}): fitness {} ms, genome {}",
            outcome.generations_evaluated,
            outcome.reason,
            outcome.best_fitness,
            outcome.best_genome
        );
    }
}

// For handing progress to another thread
pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { generation: usize, best_fitness: u32, mean_fitness: f64 },
    RunComplete { best_fitness: u32, generations_evaluated: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, generation: usize, best_fitness: u32, mean_fitness: f64) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            generation,
            best_fitness,
            mean_fitness,
        });
    }

    fn on_run_complete(&mut self, outcome: &RunOutcome) {
        let _ = self.sender.send(ProgressMessage::RunComplete {
            best_fitness: outcome.best_fitness,
            generations_evaluated: outcome.generations_evaluated,
        });
    }
}
