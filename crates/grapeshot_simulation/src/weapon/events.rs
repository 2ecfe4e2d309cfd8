//! Weapon events, filter context и таймеры

use bevy::prelude::*;

use crate::components::ProjectileStats;
use crate::modifiers::ModifierStacks;

/// Событие: число патронов изменилось (выстрел / конец перезарядки)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AmmoChanged {
    pub shooter: Entity,
    pub current: u32,
    pub magazine_size: u32,
}

/// Событие: перезарядка началась
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ReloadStarted {
    pub shooter: Entity,
    /// Тик, на котором магазин будет полон
    pub completes_at: u64,
}

/// Filter context: выстрел
///
/// Стартует с `WeaponSpec` стрелка. Итог: pellets ≥ 1, spread ≥ 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireFilter {
    pub shooter: Entity,
    pub stats: ProjectileStats,
    pub pellets: u32,
    pub spread_degrees: f32,
    pub modifiers: ModifierStacks,
}

/// Payload для `TimerQueue<WeaponTimer>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponTimer {
    ReloadComplete { shooter: Entity },
}
