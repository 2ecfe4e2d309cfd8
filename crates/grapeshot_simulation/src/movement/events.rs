//! Movement events и filter contexts

use bevy::prelude::*;

use crate::modifiers::ModifierStacks;

/// Event: персонаж оттолкнулся от земли
///
/// Генерируется: cpm_movement (ground move с очередью прыжка)
#[derive(Event, Debug, Clone)]
pub struct PlayerJumped {
    pub entity: Entity,
    pub position: Vec3,
}

/// Filter context: скорость движения игрока
///
/// Базовые значения - snapshot `MovementBase` при спавне.
/// Фильтры (модификаторы, статус-эффекты) переписывают рабочие поля.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSpeedFilter {
    pub entity: Entity,
    pub base_move_speed: f32,
    pub move_speed: f32,
    pub base_side_strafe_speed: f32,
    pub side_strafe_speed: f32,
    pub base_run_acceleration: f32,
    pub run_acceleration: f32,
    /// Модификаторы владельца на момент тика
    pub modifiers: ModifierStacks,
}

impl MoveSpeedFilter {
    pub fn new(entity: Entity, base: &crate::components::MovementBase) -> Self {
        Self {
            entity,
            base_move_speed: base.move_speed,
            move_speed: base.move_speed,
            base_side_strafe_speed: base.side_strafe_speed,
            side_strafe_speed: base.side_strafe_speed,
            base_run_acceleration: base.run_acceleration,
            run_acceleration: base.run_acceleration,
            modifiers: ModifierStacks::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: ModifierStacks) -> Self {
        self.modifiers = modifiers;
        self
    }
}
