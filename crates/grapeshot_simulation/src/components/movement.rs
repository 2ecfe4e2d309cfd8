//! Movement компоненты: тело персонажа, взгляд, tuning CPM-физики

use bevy::prelude::*;
use serde::Deserialize;

use crate::input::LookSettings;

/// Управляемое тело (velocity + контакт с землёй)
///
/// Мутируется один раз за тик movement-системами.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ControlledBody {
    /// Скорость (m/s)
    pub velocity: Vec3,
    /// На земле (пересчитывается каждый тик из ground probe)
    pub grounded: bool,
    /// Максимальная горизонтальная скорость за жизнь (диагностика)
    pub top_speed: f32,
}

impl ControlledBody {
    /// Горизонтальная скорость (без Y)
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }

    pub fn track_top_speed(&mut self) {
        self.top_speed = self.top_speed.max(self.horizontal_speed());
    }
}

/// Поворот взгляда (градусы)
///
/// - yaw: положительный - поворот вправо
/// - pitch: положительный - взгляд вверх, clamp [-90, 90]
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ViewRotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl ViewRotation {
    pub const PITCH_LIMIT: f32 = 90.0;

    /// Множитель mouse delta → градусы
    pub const LOOK_SCALE: f32 = 0.02;

    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self {
            pitch: pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            yaw,
        }
    }

    /// Применить mouse delta (pitch клампится)
    pub fn apply_look(&mut self, delta: Vec2, settings: &LookSettings) {
        self.pitch += delta.y * settings.y_sensitivity * Self::LOOK_SCALE;
        self.yaw += delta.x * settings.x_sensitivity * Self::LOOK_SCALE;
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Поворот тела (только yaw)
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Поворот камеры (yaw + pitch)
    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        )
    }

    /// Направление взгляда (unit)
    pub fn forward(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }
}

/// Tuning CPM-физики (Quake 3 CPM(A) defaults)
///
/// Может меняться геймплейными эффектами между тиками (move-speed filter),
/// но не во время тика.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct MovementTuning {
    /// Гравитация (m/s², положительная вниз)
    pub gravity: f32,
    /// Ground friction
    pub friction: f32,
    /// Ground move speed
    pub move_speed: f32,
    /// Ground accel
    pub run_acceleration: f32,
    /// Пол контроля friction на земле
    pub run_deceleration: f32,
    /// Air accel
    pub air_acceleration: f32,
    /// Deceleration при встречном стрейфе (и пол friction в воздухе)
    pub air_deceleration: f32,
    /// Точность air control (0 = выключен)
    pub air_control: f32,
    /// Множитель friction в воздухе
    pub air_friction: f32,
    /// Accel при чистом боковом стрейфе
    pub side_strafe_acceleration: f32,
    /// Max скорость чистого бокового стрейфа
    pub side_strafe_speed: f32,
    /// Вертикальная скорость прыжка
    pub jump_speed: f32,
    /// Удержание прыжка = идеальный bhop
    pub hold_jump_to_bhop: bool,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            friction: 6.0,
            move_speed: 12.0,
            run_acceleration: 10.0,
            run_deceleration: 8.0,
            air_acceleration: 2.0,
            air_deceleration: 8.0,
            air_control: 0.5,
            air_friction: 0.5,
            side_strafe_acceleration: 50.0,
            side_strafe_speed: 1.0,
            jump_speed: 10.0,
            hold_jump_to_bhop: false,
        }
    }
}

/// Базовые значения для move-speed filter (snapshot при спавне)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementBase {
    pub move_speed: f32,
    pub side_strafe_speed: f32,
    pub run_acceleration: f32,
}

impl From<&MovementTuning> for MovementBase {
    fn from(tuning: &MovementTuning) -> Self {
        Self {
            move_speed: tuning.move_speed,
            side_strafe_speed: tuning.side_strafe_speed,
            run_acceleration: tuning.run_acceleration,
        }
    }
}

/// Команда движения за тик (оси в локальных координатах тела)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MoveCommand {
    pub forward_move: f32,
    pub right_move: f32,
}

impl MoveCommand {
    pub fn new(forward_move: f32, right_move: f32) -> Self {
        Self {
            forward_move,
            right_move,
        }
    }

    /// Только боковой стрейф (без forward компоненты)
    pub fn is_pure_strafe(&self) -> bool {
        self.forward_move == 0.0 && self.right_move != 0.0
    }
}

/// Q3: прыжок можно поставить в очередь до приземления
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct JumpQueue {
    pub wish_jump: bool,
}

/// Поза камеры игрока (для presentation sync)
///
/// Камера внутри капсулы: позиция тела + y_offset.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerView {
    pub y_offset: f32,
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            y_offset: 0.6,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}
