//! Ошибки симуляции
//!
//! Только ошибки конфигурации: runtime-ситуации (отрицательные статы, pitch)
//! молча клампятся и сюда не попадают.

use bevy::ecs::entity::Entity;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// Ray cast вернул collider без CollisionLayer - маска projectile
    /// включает лишние слои.
    #[error("collider {collider:?} has no collision layer (projectile mask includes too many layers)")]
    UnclassifiedLayer { collider: Entity },

    /// Попали в entity без Health
    #[error("hit target {target:?} has no Health component")]
    MissingDamageable { target: Entity },

    #[error("failed to read config {0}: {1}")]
    ConfigIo(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
