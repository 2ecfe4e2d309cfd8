//! Projectile компоненты: статы и mutable состояние полёта
//!
//! Projectile - не rapier body: движение и коллизии целиком в
//! `Projectile::step` (ray stepping), Transform только синхронизируется.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashSet;

use crate::modifiers::ModifierStacks;
use crate::physics::LayerMask;

/// Базовые статы projectile (с полами)
///
/// Модификаторы могут временно увести статы ниже пола -
/// `clamp_to_floors` возвращает их каждый тик.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[serde(default)]
pub struct ProjectileStats {
    /// Урон при попадании в entity
    pub damage: f32,
    /// Скорость (m/s)
    pub speed: f32,
    pub min_speed: f32,
    /// Дальность (m)
    pub range: f32,
    pub min_range: f32,
    /// Сколько отскоков от стен переживает projectile
    pub bounces: i32,
    pub min_bounces: i32,
    /// Сколько пробитий entity переживает projectile
    pub pierces: i32,
    pub min_pierces: i32,
    /// Сила взрыва при expire (до filter chain)
    pub base_explosion_power: i32,
}

impl Default for ProjectileStats {
    fn default() -> Self {
        Self {
            damage: 10.0,
            speed: 60.0,
            min_speed: 1.0,
            range: 100.0,
            min_range: 10.0,
            bounces: 0,
            min_bounces: 0,
            pierces: 0,
            min_pierces: 0,
            base_explosion_power: 0,
        }
    }
}

impl ProjectileStats {
    /// Вернуть статы на полы (silent clamp, не ошибка)
    pub fn clamp_to_floors(&mut self) {
        self.speed = self.speed.max(self.min_speed);
        self.range = self.range.max(self.min_range);
        self.bounces = self.bounces.max(self.min_bounces);
        self.pierces = self.pierces.max(self.min_pierces);
    }
}

/// Летящий projectile
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub stats: ProjectileStats,
    /// Направление полёта (unit)
    pub heading: Vec3,
    /// Пройденная дистанция, инвариант: ≤ max(range, min_range)
    pub distance_traveled: f32,
    pub total_bounces: i32,
    pub total_pierces: i32,
    /// Цели, уже получившие урон в текущей "эпохе" (сброс на отскоке)
    pub damaged: HashSet<Entity>,
    /// Collider, который projectile сейчас пробивает (исключён из cast'ов)
    pub passing_through: Option<Entity>,
    /// Кто выстрелил (его collider не задевается)
    pub shooter: Option<Entity>,
    /// Слои, по которым идёт ray cast
    pub mask: LayerMask,
    /// Snapshot модификаторов стрелка (для ExpireFilter)
    pub modifiers: ModifierStacks,
}

impl Projectile {
    pub fn new(stats: ProjectileStats, heading: Vec3, shooter: Option<Entity>) -> Self {
        Self {
            stats,
            heading: heading.normalize_or(Vec3::NEG_Z),
            distance_traveled: 0.0,
            total_bounces: 0,
            total_pierces: 0,
            damaged: HashSet::new(),
            passing_through: None,
            shooter,
            mask: LayerMask::PROJECTILE,
            modifiers: ModifierStacks::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierStacks) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Оставшаяся дальность
    pub fn remaining_range(&self) -> f32 {
        self.stats.range - self.distance_traveled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_to_floors() {
        let mut stats = ProjectileStats {
            speed: -5.0,
            range: 2.0,
            bounces: -3,
            pierces: -1,
            min_bounces: 1,
            ..default()
        };
        stats.clamp_to_floors();

        assert_eq!(stats.speed, 1.0);
        assert_eq!(stats.range, 10.0);
        assert_eq!(stats.bounces, 1);
        assert_eq!(stats.pierces, 0);
    }

    #[test]
    fn test_clamp_keeps_valid_stats() {
        let mut stats = ProjectileStats {
            speed: 80.0,
            range: 50.0,
            bounces: 2,
            pierces: 3,
            ..default()
        };
        let before = stats;
        stats.clamp_to_floors();
        assert_eq!(stats, before);
    }

    #[test]
    fn test_new_normalizes_heading() {
        let projectile = Projectile::new(ProjectileStats::default(), Vec3::new(0.0, 0.0, 5.0), None);
        assert!((projectile.heading - Vec3::Z).length() < 1e-6);

        let degenerate = Projectile::new(ProjectileStats::default(), Vec3::ZERO, None);
        assert_eq!(degenerate.heading, Vec3::NEG_Z);
    }
}
