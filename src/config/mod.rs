pub mod traits;
pub mod physics;
pub mod evolution;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use physics::{PhysicsConfig, NumericPolicy};
pub use evolution::{EvolutionConfig, SelectionMethod, BestPolicy, EvaluatorKind};
pub use traits::ConfigSection;
