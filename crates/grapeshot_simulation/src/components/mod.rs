//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: живые существа (Health)
//! - movement: CPM тело, взгляд, tuning (ControlledBody, ViewRotation, MovementTuning)
//! - projectile: статы и состояние полёта (ProjectileStats, Projectile)

pub mod actor;
pub mod movement;
pub mod projectile;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use projectile::*;
