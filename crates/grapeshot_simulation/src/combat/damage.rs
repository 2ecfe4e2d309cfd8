//! Damage / death
//!
//! Урон наносят projectile'ы (ray stepping) и взрывы.
//! Смерть детектится отдельной системой по Health.

use bevy::prelude::*;

use crate::components::Health;

/// Источник урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    /// Прямое попадание (entity projectile'а)
    Projectile(Entity),
    /// Взрыв на expire
    Explosion,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    /// Реально снятое HP
    pub amount: f32,
    pub source: DamageSource,
}

/// Событие: entity умер (health <= 0)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Мертвые не двигаются и не стреляют.
/// Деспавн не автоматический - трупы остаются на месте.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Система: пометка умерших + EntityDied (один раз на entity)
///
/// Killer - attacker последнего DamageDealt по этой цели за тик.
pub fn detect_deaths(
    mut commands: Commands,
    mut damage_events: EventReader<DamageDealt>,
    targets: Query<(Entity, &Health), Without<Dead>>,
    mut died_events: EventWriter<EntityDied>,
) {
    let damage: Vec<&DamageDealt> = damage_events.read().collect();

    for (entity, health) in targets.iter() {
        if health.is_alive() {
            continue;
        }

        let killer = damage
            .iter()
            .rev()
            .find(|event| event.target == entity)
            .and_then(|event| event.attacker);

        commands.entity(entity).insert(Dead);
        died_events.write(EntityDied { entity, killer });

        crate::logger::log_info(&format!("Entity {:?} died (killer: {:?})", entity, killer));
    }
}
