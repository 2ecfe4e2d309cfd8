//! Collision world abstraction
//!
//! Ядро (projectile stepping, ground probe) не знает про rapier:
//! оно получает `&dyn CollisionWorld` снаружи.
//! Реализации: `StaticWorld` (headless), `RapierCollisionWorld` (движок).

use bevy::prelude::*;

use super::layers::{CollisionLayer, LayerMask};

/// Результат ray cast (read-only для ядра)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    /// Дистанция от origin до точки попадания
    pub distance: f32,
    pub point: Vec3,
    /// Нормаль поверхности (unit)
    pub normal: Vec3,
    /// Collider, в который попали
    pub collider: Entity,
    /// Identity цели для урона (owner hitbox'а или сам collider)
    pub target: Entity,
    /// None = collider без слоя (ошибка конфигурации)
    pub layer: Option<CollisionLayer>,
}

/// Капсула персонажа (ось Y)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Capsule {
    /// Половина высоты цилиндрической части
    pub half_height: f32,
    pub radius: f32,
}

impl Default for Capsule {
    fn default() -> Self {
        // Высота 1.8m: 2 * 0.5 + 2 * 0.4
        Self {
            half_height: 0.5,
            radius: 0.4,
        }
    }
}

/// Owner hitbox'а: урон уходит не collider'у, а этой entity
///
/// Несколько hitbox'ов одного врага = одна identity для damaged-set.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct HitboxOwner(pub Entity);

pub trait CollisionWorld {
    /// Ближайшее попадание луча (direction - unit) в пределах max_distance
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        exclude: &[Entity],
    ) -> Option<CollisionHit>;

    /// Capsule cast вниз на `skin` против геометрии уровня
    fn probe_ground(&self, body: Entity, center: Vec3, capsule: Capsule, skin: f32) -> bool;
}

/// Пустой мир: ни одного collider'а (нет ни StaticWorld, ни rapier)
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyWorld;

impl CollisionWorld for EmptyWorld {
    fn cast_ray(&self, _: Vec3, _: Vec3, _: f32, _: LayerMask, _: &[Entity]) -> Option<CollisionHit> {
        None
    }

    fn probe_ground(&self, _: Entity, _: Vec3, _: Capsule, _: f32) -> bool {
        false
    }
}

/// Зеркальное отражение направления от поверхности
pub fn reflect(direction: Vec3, normal: Vec3) -> Vec3 {
    direction - 2.0 * direction.dot(normal) * normal
}
