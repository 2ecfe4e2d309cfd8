//! Модификаторы (карты) игрока
//!
//! Инвентарь ограниченной ёмкости. Эффекты - чистые фильтры,
//! зарегистрированные в filter chain'ах при сборке plugin'а:
//! - GrapeShot: +2 дробины и +4° разброса за стак (FireFilter)
//! - Ricochet: +1 отскок за стак (FireFilter)
//! - Piercing: +1 пробитие за стак (FireFilter)
//! - Volatile: +1 сила взрыва за стак (ExpireFilter)
//! - Haste: +10% скорости движения за стак (MoveSpeedFilter)
//!
//! Контексты несут snapshot `ModifierStacks` владельца, фильтрам
//! не нужен доступ к ECS.

use bevy::prelude::*;
use serde::Deserialize;

use crate::events::FilterAppExt;
use crate::movement::MoveSpeedFilter;
use crate::projectile::ExpireFilter;
use crate::weapon::FireFilter;

pub const DEFAULT_INVENTORY_CAPACITY: usize = 5;

pub const GRAPE_SHOT_PELLETS: u32 = 2;
pub const GRAPE_SHOT_SPREAD_DEGREES: f32 = 4.0;
pub const HASTE_BONUS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Reflect)]
pub enum Modifier {
    GrapeShot,
    Volatile,
    Ricochet,
    Piercing,
    Haste,
}

/// Количество стаков каждого модификатора
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ModifierStacks {
    pub grape_shot: u32,
    pub volatile: u32,
    pub ricochet: u32,
    pub piercing: u32,
    pub haste: u32,
}

impl ModifierStacks {
    pub fn count(&self, modifier: Modifier) -> u32 {
        match modifier {
            Modifier::GrapeShot => self.grape_shot,
            Modifier::Volatile => self.volatile,
            Modifier::Ricochet => self.ricochet,
            Modifier::Piercing => self.piercing,
            Modifier::Haste => self.haste,
        }
    }

    fn add(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::GrapeShot => self.grape_shot += 1,
            Modifier::Volatile => self.volatile += 1,
            Modifier::Ricochet => self.ricochet += 1,
            Modifier::Piercing => self.piercing += 1,
            Modifier::Haste => self.haste += 1,
        }
    }
}

/// Инвентарь модификаторов
///
/// Инвариант: slots.len() ≤ capacity
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ModifierInventory {
    capacity: usize,
    slots: Vec<Modifier>,
}

impl Default for ModifierInventory {
    fn default() -> Self {
        Self::new(DEFAULT_INVENTORY_CAPACITY)
    }
}

impl ModifierInventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Экипировать. false - инвентарь полон.
    pub fn equip(&mut self, modifier: Modifier) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots.push(modifier);
        true
    }

    /// Снять модификатор из слота
    pub fn remove(&mut self, slot: usize) -> Option<Modifier> {
        (slot < self.slots.len()).then(|| self.slots.remove(slot))
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slots(&self) -> &[Modifier] {
        &self.slots
    }

    pub fn stacks(&self) -> ModifierStacks {
        let mut stacks = ModifierStacks::default();
        for modifier in &self.slots {
            stacks.add(*modifier);
        }
        stacks
    }
}

/// GrapeShot / Ricochet / Piercing
pub fn fire_modifiers(mut ctx: FireFilter) -> FireFilter {
    let stacks = ctx.modifiers;
    ctx.pellets += GRAPE_SHOT_PELLETS * stacks.grape_shot;
    ctx.spread_degrees += GRAPE_SHOT_SPREAD_DEGREES * stacks.grape_shot as f32;
    ctx.stats.bounces += stacks.ricochet as i32;
    ctx.stats.pierces += stacks.piercing as i32;
    ctx
}

/// Volatile
pub fn expire_modifiers(mut ctx: ExpireFilter) -> ExpireFilter {
    ctx.explosion_power += ctx.modifiers.volatile as i32;
    ctx
}

/// Haste (от base значений, не накапливается между тиками)
pub fn move_speed_modifiers(mut ctx: MoveSpeedFilter) -> MoveSpeedFilter {
    let multiplier = 1.0 + HASTE_BONUS * ctx.modifiers.haste as f32;
    ctx.move_speed *= multiplier;
    ctx.side_strafe_speed *= multiplier;
    ctx.run_acceleration *= multiplier;
    ctx
}

pub struct ModifierPlugin;

impl Plugin for ModifierPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ModifierInventory>()
            .add_filter(fire_modifiers)
            .add_filter(expire_modifiers)
            .add_filter(move_speed_modifiers);
    }
}
