//! Projectile events и filter contexts
//!
//! Notifications - fire-and-forget Bevy events.
//! Expire - filterable: `ExpireFilter` проходит через chain, ядро читает
//! итоговую explosion_power.

use bevy::prelude::*;

use crate::modifiers::ModifierStacks;
use crate::physics::CollisionLayer;

/// Событие: projectile выпущен
#[derive(Event, Debug, Clone)]
pub struct ProjectileFired {
    pub projectile: Entity,
    pub shooter: Option<Entity>,
    pub origin: Vec3,
    pub heading: Vec3,
}

/// Событие: отскок от геометрии уровня
#[derive(Event, Debug, Clone)]
pub struct ProjectileHitWall {
    pub projectile: Entity,
    pub collider: Entity,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Событие: попадание в entity (Enemy/Player)
///
/// `damaged = false` - цель уже получила урон в текущей эпохе.
#[derive(Event, Debug, Clone)]
pub struct ProjectileHitEntity {
    pub projectile: Entity,
    pub shooter: Option<Entity>,
    pub target: Entity,
    pub collider: Entity,
    pub layer: CollisionLayer,
    pub point: Vec3,
    pub damaged: bool,
}

/// Событие: projectile уничтожен
#[derive(Event, Debug, Clone)]
pub struct ProjectileExpired {
    pub projectile: Entity,
    pub shooter: Option<Entity>,
    pub position: Vec3,
    /// true = попадание (отскок/пробитие сверх бюджета), false = кончилась дальность
    pub on_hit: bool,
    /// Итоговая сила взрыва после filter chain (≥ 0)
    pub explosion_power: i32,
}

/// Filter context: expire projectile'а
///
/// explosion_power стартует с `ProjectileStats::base_explosion_power`,
/// слушатели могут переписать. Отрицательное значение клампится в 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpireFilter {
    pub projectile: Entity,
    pub shooter: Option<Entity>,
    pub expired_on_hit: bool,
    pub position: Vec3,
    pub explosion_power: i32,
    /// Модификаторы стрелка на момент выстрела
    pub modifiers: ModifierStacks,
}
