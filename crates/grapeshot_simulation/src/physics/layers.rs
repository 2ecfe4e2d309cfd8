//! Collision layers
//!
//! Каждый collider, который может попасть под ray cast projectile'а,
//! обязан нести `CollisionLayer`. Collider без слоя под маской -
//! ошибка конфигурации (`SimulationError::UnclassifiedLayer`).
//!
//! Rapier groups:
//! - GROUP_1: Level (статическая геометрия)
//! - GROUP_2: Player
//! - GROUP_3: Enemy

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionGroups, Group};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum CollisionLayer {
    /// Статическая геометрия уровня (отскок)
    Level,
    /// Игрок (урон + пробитие)
    Player,
    /// Враг (урон + пробитие)
    Enemy,
}

impl CollisionLayer {
    pub const fn bits(self) -> u32 {
        match self {
            CollisionLayer::Level => 1 << 0,
            CollisionLayer::Player => 1 << 1,
            CollisionLayer::Enemy => 1 << 2,
        }
    }

    /// Получает урон от projectile?
    pub fn is_damageable(self) -> bool {
        matches!(self, CollisionLayer::Player | CollisionLayer::Enemy)
    }

    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.bits())
    }

    /// Groups для collider'а этого слоя (коллайдит со всеми)
    pub fn groups(self) -> CollisionGroups {
        CollisionGroups::new(self.group(), Group::ALL)
    }
}

/// Маска слоёв для ray cast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const LEVEL: LayerMask = LayerMask(CollisionLayer::Level.bits());
    /// Всё, во что врезается projectile
    pub const PROJECTILE: LayerMask = LayerMask(
        CollisionLayer::Level.bits() | CollisionLayer::Player.bits() | CollisionLayer::Enemy.bits(),
    );

    pub const fn with(self, layer: CollisionLayer) -> Self {
        LayerMask(self.0 | layer.bits())
    }

    pub const fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & layer.bits() != 0
    }

    /// Rapier filter groups
    pub fn group(self) -> Group {
        Group::from_bits_truncate(self.0)
    }
}
