use super::{crossover::CrossoverConfig, evaluation::EvaluationConfig, traits::ConfigSection};
use crate::error::StackgpError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix of environment overrides, e.g. `STACKGP__CROSSOVER__SEED=7`.
pub const ENV_PREFIX: &str = "STACKGP";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evaluation: EvaluationConfig,
    pub crossover: CrossoverConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), StackgpError> {
        self.evaluation.validate()?;
        self.crossover.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TOML or JSON file, with `STACKGP__*` environment overrides on top.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StackgpError> {
        self.load_layered(path, ENV_PREFIX)
    }

    pub fn load_layered<P: AsRef<Path>>(&self, path: P, env_prefix: &str) -> Result<(), StackgpError> {
        let path = path.as_ref();
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), StackgpError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)
            .map_err(|e| StackgpError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path.as_ref(), toml_str)?;
        log::info!("Saved configuration to {}", path.as_ref().display());
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), StackgpError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}
