//! CPM (Quake 3 CPMA) motor
//!
//! Чистые функции над velocity: никакого ECS, никакого collision world.
//! Одна velocity-мутация за тик: `CpmMotor::step`.

use bevy::prelude::*;

use crate::components::{ControlledBody, JumpQueue, MoveCommand, MovementTuning};

/// Коэффициент air control (idTech)
pub const AIR_CONTROL_COEFFICIENT: f32 = 32.0;

/// Порог "нет forward input" / "нет wish speed" для air control
const AIR_CONTROL_EPSILON: f32 = 0.001;

/// Intent в локальных осях тела → мировое направление
///
/// forward = -Z, right = +X. Длина = длина intent'а (не нормализуется).
pub fn wish_vector(cmd: MoveCommand, orientation: Quat) -> Vec3 {
    orientation * Vec3::new(cmd.right_move, 0.0, -cmd.forward_move)
}

/// Wish direction (unit или ноль) + wish speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WishMove {
    pub direction: Vec3,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct CpmMotor {
    pub tuning: MovementTuning,
    /// Длительность тика (секунды)
    pub dt: f32,
}

impl CpmMotor {
    pub fn new(tuning: MovementTuning, dt: f32) -> Self {
        Self { tuning, dt }
    }

    /// Wish speed = min(|intent|, 1) × move_speed
    pub fn wish(&self, cmd: MoveCommand, orientation: Quat) -> WishMove {
        let wish = wish_vector(cmd, orientation);
        WishMove {
            direction: wish.normalize_or_zero(),
            speed: wish.length().min(1.0) * self.tuning.move_speed,
        }
    }

    /// Friction по горизонтали
    ///
    /// Пол контроля: run_deceleration на земле, air_deceleration в воздухе.
    /// Инвариант: скорость не уходит в минус и не меняет направление.
    pub fn apply_friction(&self, velocity: &mut Vec3, grounded: bool, scale: f32) {
        let speed = Vec3::new(velocity.x, 0.0, velocity.z).length();
        let floor = if grounded {
            self.tuning.run_deceleration
        } else {
            self.tuning.air_deceleration
        };

        let control = speed.max(floor);
        let drop = control * self.tuning.friction * self.dt * scale;
        let new_speed = (speed - drop).max(0.0);

        if speed > 0.0 {
            let factor = new_speed / speed;
            velocity.x *= factor;
            velocity.z *= factor;
        }
    }

    /// Q3 accelerate: добавляет скорость вдоль wish_dir до wish_speed
    pub fn accelerate(&self, velocity: &mut Vec3, wish_dir: Vec3, wish_speed: f32, accel: f32) {
        let current_speed = velocity.dot(wish_dir);
        let add_speed = wish_speed - current_speed;
        if add_speed <= 0.0 {
            return;
        }

        let accel_speed = (accel * self.dt * wish_speed).min(add_speed);
        velocity.x += accel_speed * wish_dir.x;
        velocity.z += accel_speed * wish_dir.z;
    }

    /// CPM air control: поворот горизонтальной скорости к wish_dir без потери модуля
    pub fn air_control(&self, velocity: &mut Vec3, wish_dir: Vec3, wish_speed: f32, forward_move: f32) {
        if forward_move.abs() < AIR_CONTROL_EPSILON || wish_speed.abs() < AIR_CONTROL_EPSILON {
            return;
        }

        let vertical = velocity.y;
        let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
        let speed = horizontal.length();
        let mut direction = horizontal.normalize_or_zero();

        let dot = direction.dot(wish_dir);
        let k = AIR_CONTROL_COEFFICIENT * self.tuning.air_control * dot * dot * self.dt;

        // Меняем направление, сохраняя скорость
        if dot > 0.0 {
            direction = (direction * speed + wish_dir * k).normalize_or_zero();
        }

        velocity.x = direction.x * speed;
        velocity.z = direction.z * speed;
        velocity.y = vertical;
    }

    /// Шаг на земле. Возвращает true, если был прыжок.
    pub fn ground_move(&self, velocity: &mut Vec3, wish: WishMove, jump: &mut JumpQueue) -> bool {
        self.apply_friction(velocity, true, 1.0);
        self.accelerate(velocity, wish.direction, wish.speed, self.tuning.run_acceleration);

        // Сброс накопленной скорости падения
        velocity.y = -self.tuning.gravity * self.dt;

        if jump.wish_jump {
            velocity.y = self.tuning.jump_speed;
            jump.wish_jump = false;
            return true;
        }
        false
    }

    /// Шаг в воздухе
    pub fn air_move(&self, velocity: &mut Vec3, cmd: MoveCommand, wish: WishMove) {
        self.apply_friction(velocity, false, self.tuning.air_friction);

        // Air control видит wish speed до clamp'а стрейфа
        let unclamped_speed = wish.speed;
        let mut wish_speed = wish.speed;
        let mut accel = if velocity.dot(wish.direction) < 0.0 {
            self.tuning.air_deceleration
        } else {
            self.tuning.air_acceleration
        };

        if cmd.is_pure_strafe() {
            wish_speed = wish_speed.min(self.tuning.side_strafe_speed);
            accel = self.tuning.side_strafe_acceleration;
        }

        self.accelerate(velocity, wish.direction, wish_speed, accel);
        if self.tuning.air_control > 0.0 {
            self.air_control(velocity, wish.direction, unclamped_speed, cmd.forward_move);
        }

        velocity.y -= self.tuning.gravity * self.dt;
    }

    /// Полный шаг движения (режим по `body.grounded`)
    pub fn step(&self, body: &mut ControlledBody, cmd: MoveCommand, orientation: Quat, jump: &mut JumpQueue) -> bool {
        let wish = self.wish(cmd, orientation);
        let mut velocity = body.velocity;

        let jumped = if body.grounded {
            self.ground_move(&mut velocity, wish, jump)
        } else {
            self.air_move(&mut velocity, cmd, wish);
            false
        };

        body.velocity = velocity;
        jumped
    }
}
