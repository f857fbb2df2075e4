use crate::config::PhysicsConfig;
use crate::engines::generation::genome::Genome;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

pub const TRAJECTORY_HEADER: &str = "c_position p_angle force";
pub const SUMMARY_HEADER: &str = "generation fitness k l m n time_step fail_position fail_angle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForceSign {
    Positive,
    Negative,
}

impl ForceSign {
    pub fn as_f64(self) -> f64 {
        match self {
            ForceSign::Positive => 1.0,
            ForceSign::Negative => -1.0,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            ForceSign::Positive => 1,
            ForceSign::Negative => -1,
        }
    }
}

/// State observed after positions advance and the force is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryStep {
    pub cart_position: f64,
    pub pole_angle: f64,
    pub force_sign: ForceSign,
}

/// Full replay of one episode, including the failing step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    pub genome: Genome,
    pub fitness: u32,
    pub steps: Vec<TrajectoryStep>,
}

impl Trajectory {
    /// Writes the space separated per-step table with its header row.
    pub fn write_table<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", TRAJECTORY_HEADER)?;
        for step in &self.steps {
            writeln!(
                writer,
                "{:.6} {:.6} {}",
                step.cart_position,
                step.pole_angle,
                step.force_sign.as_i8()
            )?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn summary(&self, generation: Option<usize>, physics: &PhysicsConfig) -> RunSummary {
        RunSummary {
            generation: generation.map_or(-1, |g| g as i64),
            fitness: self.fitness,
            genes: *self.genome.genes(),
            time_step_ms: physics.time_step_ms,
            fail_position_m: physics.fail_position_m,
            fail_angle_rad: physics.fail_angle_rad,
        }
    }
}

/// One-line description of a scored genome and the limits it ran under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// -1 when the genome did not come out of a run
    pub generation: i64,
    pub fitness: u32,
    pub genes: [i32; 4],
    pub time_step_ms: u32,
    pub fail_position_m: f64,
    pub fail_angle_rad: f64,
}

impl RunSummary {
    pub fn write_table<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SUMMARY_HEADER)?;
        writeln!(
            writer,
            "{} {} {} {} {} {} {} {:.6} {:.6}",
            self.generation,
            self.fitness,
            self.genes[0],
            self.genes[1],
            self.genes[2],
            self.genes[3],
            self.time_step_ms,
            self.fail_position_m,
            self.fail_angle_rad
        )?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
