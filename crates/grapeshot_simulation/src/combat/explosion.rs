//! Explosion falloff
//!
//! Взрыв возникает на expire projectile'а с power > 0:
//! - damage = power × damage_multiplier
//! - range  = power × range_multiplier
//! - урон линейно падает от центра до 0 на границе range

use bevy::prelude::*;
use serde::Deserialize;

use super::damage::{DamageDealt, DamageSource, Dead};
use crate::components::Health;

/// Множители power → урон/радиус
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct ExplosionConfig {
    pub damage_multiplier: f32,
    pub range_multiplier: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            damage_multiplier: 3.0,
            range_multiplier: 3.0,
        }
    }
}

/// Событие: взрыв (power уже после ExpireFilter chain, > 0)
#[derive(Event, Debug, Clone)]
pub struct ExplosionTriggered {
    pub position: Vec3,
    pub power: i32,
    /// Владелец projectile'а
    pub instigator: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub center: Vec3,
    pub damage: f32,
    pub range: f32,
}

impl Explosion {
    pub fn new(center: Vec3, power: i32, config: &ExplosionConfig) -> Self {
        let power = power.max(0) as f32;
        Self {
            center,
            damage: power * config.damage_multiplier,
            range: power * config.range_multiplier,
        }
    }

    /// Урон в точке: full в центре → 0 на радиусе и дальше
    pub fn damage_at(&self, position: Vec3) -> f32 {
        let distance = self.center.distance(position);
        if distance >= self.range {
            return 0.0;
        }
        (1.0 - distance / self.range) * self.damage
    }
}

/// Система: урон от взрывов всем живым в радиусе
pub fn apply_explosions(
    mut explosions: EventReader<ExplosionTriggered>,
    config: Res<ExplosionConfig>,
    mut targets: Query<(Entity, &Transform, &mut Health), Without<Dead>>,
    mut damage_events: EventWriter<DamageDealt>,
) {
    for event in explosions.read() {
        let explosion = Explosion::new(event.position, event.power, &config);

        crate::logger::log(&format!(
            "Explosion at {:?}: power {}, damage {}, range {}",
            explosion.center, event.power, explosion.damage, explosion.range
        ));

        for (entity, transform, mut health) in targets.iter_mut() {
            let damage = explosion.damage_at(transform.translation);
            if damage <= 0.0 {
                continue;
            }

            let applied = health.take_damage(damage);
            damage_events.write(DamageDealt {
                attacker: event.instigator,
                target: entity,
                amount: applied,
                source: DamageSource::Explosion,
            });
        }
    }
}
