//! Per-tick input snapshot
//!
//! Заполняется внешним input glue (bindings вне симуляции).
//! Для headless тестов - mock input через этот компонент.
//! Edge-флаги (just_pressed / just_released) сбрасываются в конце тика,
//! чтобы одно нажатие не обработалось дважды.

use bevy::prelude::*;

/// Состояние кнопки за тик
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ButtonState {
    /// Кнопка зажата
    pub pressed: bool,
    /// Нажата в этом тике
    pub just_pressed: bool,
    /// Отпущена в этом тике
    pub just_released: bool,
}

impl ButtonState {
    /// Нажатие (edge + hold)
    pub fn press(&mut self) {
        if !self.pressed {
            self.just_pressed = true;
        }
        self.pressed = true;
    }

    /// Отпускание (edge)
    pub fn release(&mut self) {
        if self.pressed {
            self.just_released = true;
        }
        self.pressed = false;
    }

    pub fn clear_edges(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Input персонажа за тик
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// x = right, y = forward (каждая ось в [-1, 1])
    pub move_axis: Vec2,
    /// Mouse delta (x = yaw, y = pitch)
    pub look_delta: Vec2,
    pub jump: ButtonState,
    pub fire: ButtonState,
    pub reload: ButtonState,
}

/// Чувствительность мыши
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct LookSettings {
    pub x_sensitivity: f32,
    pub y_sensitivity: f32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            x_sensitivity: 7.0,
            y_sensitivity: 7.0,
        }
    }
}

/// Система: сброс edge-флагов (последняя в тике)
pub fn clear_input_edges(mut inputs: Query<&mut PlayerInput>) {
    for mut input in inputs.iter_mut() {
        input.jump.clear_edges();
        input.fire.clear_edges();
        input.reload.clear_edges();
        input.look_delta = Vec2::ZERO;
    }
}
