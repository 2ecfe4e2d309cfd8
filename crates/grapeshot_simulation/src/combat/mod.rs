//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Dead
//! - Combat rules: explosion falloff, death detection
//! - Events: DamageDealt, ExplosionTriggered, EntityDied
//!
//! Прямые попадания наносит projectile stepping (`HealthSink`),
//! здесь только взрывы и смерть.

use bevy::prelude::*;

pub mod damage;
pub mod explosion;

// Re-export основных типов
pub use damage::{detect_deaths, DamageDealt, DamageSource, Dead, EntityDied};
pub use explosion::{apply_explosions, Explosion, ExplosionConfig, ExplosionTriggered};

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. apply_explosions - ExplosionTriggered → урон в радиусе
/// 2. detect_deaths - Health ≤ 0 → Dead + EntityDied
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<ExplosionTriggered>()
            .init_resource::<ExplosionConfig>();

        app.add_systems(
            FixedUpdate,
            (apply_explosions, detect_deaths)
                .chain()
                .in_set(SimulationSet::Combat),
        );
    }
}
