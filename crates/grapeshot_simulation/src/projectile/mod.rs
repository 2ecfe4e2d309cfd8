//! Projectile domain - ray stepping, отскоки, пробития, expire
//!
//! Flow:
//! 1. Weapon спавнит entity с `Projectile` (spawn_projectile)
//! 2. announce_fired_projectiles → ProjectileFired
//! 3. step_projectiles: `Projectile::step` через CollisionWorld
//! 4. Expire → ExpireFilter chain → ProjectileExpired (+ ExplosionTriggered)

use bevy::prelude::*;

use crate::combat::{DamageDealt, ExplosionTriggered};
use crate::events::FilterAppExt;
use crate::SimulationSet;

pub mod events;
pub mod simulator;
pub mod systems;


pub use events::*;
pub use simulator::*;
pub use systems::*;

pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileFired>()
            .add_event::<ProjectileHitWall>()
            .add_event::<ProjectileHitEntity>()
            .add_event::<ProjectileExpired>()
            .add_event::<ExplosionTriggered>()
            .add_event::<DamageDealt>()
            .init_filter::<ExpireFilter>()
            .add_systems(
                FixedUpdate,
                (announce_fired_projectiles, step_projectiles)
                    .chain()
                    .in_set(SimulationSet::Projectiles),
            );
    }
}
