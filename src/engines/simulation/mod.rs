pub mod physics;
pub mod trajectory;

pub use physics::{CartPoleState, PhysicsModel};
pub use trajectory::{ForceSign, RunSummary, Trajectory, TrajectoryStep};
