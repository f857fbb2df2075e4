use super::{evolution::EvolutionConfig, physics::PhysicsConfig, traits::ConfigSection};
use crate::error::PoleBalanceError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Prefix of environment variables overriding file values, e.g.
/// `POLEBALANCE_EVOLUTION__POPULATION_SIZE=80`.
pub const ENV_PREFIX: &str = "POLEBALANCE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub physics: PhysicsConfig,
    pub evolution: EvolutionConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), PoleBalanceError> {
        self.physics.validate()?;
        self.evolution.validate()?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PoleBalanceError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, PoleBalanceError> {
        toml::to_string_pretty(self)
            .map_err(|e| PoleBalanceError::Configuration(format!("Failed to serialize: {}", e)))
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PoleBalanceError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PoleBalanceError::Configuration(format!("Failed to read config: {}", e)))?;

        let config = AppConfig::from_toml_str(&contents)?;
        self.replace(config)
    }

    /// Defaults, then the optional TOML file, then `POLEBALANCE_*` variables.
    pub fn load_layered(&self, path: Option<&Path>) -> Result<(), PoleBalanceError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(false));
        }
        let layered = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = layered.try_deserialize()?;
        config.validate()?;
        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PoleBalanceError> {
        let toml_str = self.get().to_toml_string()?;

        std::fs::write(path, toml_str).map_err(|e| {
            PoleBalanceError::Configuration(format!("Failed to write config: {}", e))
        })?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        match self.config.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Applies `f` to a copy and keeps it only if the result validates.
    pub fn update<F>(&self, f: F) -> Result<(), PoleBalanceError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        candidate.validate()?;
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), PoleBalanceError> {
        let mut guard = self
            .config
            .write()
            .map_err(|_| PoleBalanceError::Configuration("config lock poisoned".to_string()))?;
        *guard = config;
        Ok(())
    }
}
