//! Конфигурация симуляции (TOML)
//!
//! Все поля опциональны - отсутствующие берутся из Default.
//!
//! ```toml
//! tick_hz = 60.0
//! seed = 42
//! log_level = "info"
//!
//! [movement]
//! move_speed = 14.0
//!
//! [explosion]
//! damage_multiplier = 3.0
//!
//! [weapon]
//! magazine_size = 6
//!
//! [weapon.projectile]
//! bounces = 1
//! ```

use bevy::prelude::Resource;
use serde::Deserialize;
use std::path::Path;

use crate::combat::ExplosionConfig;
use crate::components::MovementTuning;
use crate::error::SimulationError;
use crate::logger::LogLevel;
use crate::weapon::WeaponSpec;

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate (Hz)
    pub tick_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
    pub log_level: LogLevel,
    /// Tuning по умолчанию для новых персонажей
    pub movement: MovementTuning,
    pub explosion: ExplosionConfig,
    /// Оружие игрока при спавне
    pub weapon: WeaponSpec,
    pub player_health: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            log_level: LogLevel::Debug,
            movement: MovementTuning::default(),
            explosion: ExplosionConfig::default(),
            weapon: WeaponSpec::default(),
            player_health: 100.0,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, SimulationError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SimulationError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimulationError::ConfigIo(path.to_path_buf(), e))?;

        Self::from_toml_str(&content)
    }

    /// Длительность одного тика (секунды)
    pub fn tick_duration(&self) -> f32 {
        (1.0 / self.tick_hz) as f32
    }
}
