//! Tests for CPM motor.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bevy::prelude::*;
    use proptest::prelude::*;

    use crate::components::{ControlledBody, JumpQueue, MoveCommand, MovementTuning, ViewRotation};
    use crate::movement::{wish_vector, CpmMotor, WishMove};

    const DT: f32 = 1.0 / 60.0;

    fn motor() -> CpmMotor {
        CpmMotor::new(MovementTuning::default(), DT)
    }

    fn horizontal(v: Vec3) -> Vec3 {
        Vec3::new(v.x, 0.0, v.z)
    }

    #[test]
    fn test_ground_friction_drop() {
        // control = max(10, 8) = 10; drop = 10 * 6 / 60 = 1
        let mut velocity = Vec3::new(10.0, 0.0, 0.0);
        motor().apply_friction(&mut velocity, true, 1.0);
        assert_abs_diff_eq!(velocity.x, 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_friction_stops_slow_body() {
        // Ниже пола контроля: drop = 8 * 6 / 60 = 0.8 > 0.1
        let mut velocity = Vec3::new(0.1, 0.0, -0.05);
        motor().apply_friction(&mut velocity, true, 1.0);
        assert_eq!(velocity.x, 0.0);
        assert_eq!(velocity.z, 0.0);
    }

    #[test]
    fn test_air_friction_keeps_vertical() {
        let mut velocity = Vec3::new(10.0, 5.0, 0.0);
        motor().apply_friction(&mut velocity, false, 0.5);
        assert_abs_diff_eq!(velocity.x, 9.5, epsilon = 1e-4);
        assert_eq!(velocity.y, 5.0);
    }

    #[test]
    fn test_accelerate_from_rest() {
        // accel_speed = min(10 / 60 * 12, 12) = 2
        let mut velocity = Vec3::ZERO;
        motor().accelerate(&mut velocity, Vec3::X, 12.0, 10.0);
        assert_abs_diff_eq!(velocity.x, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_accelerate_noop_at_wish_speed() {
        let mut velocity = Vec3::new(12.0, 0.0, 0.0);
        motor().accelerate(&mut velocity, Vec3::X, 12.0, 10.0);
        assert_eq!(velocity, Vec3::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_accelerate_only_horizontal() {
        let mut velocity = Vec3::new(0.0, 3.0, 0.0);
        motor().accelerate(&mut velocity, Vec3::X, 12.0, 10.0);
        assert_eq!(velocity.y, 3.0);
    }

    #[test]
    fn test_air_control_requires_forward_input() {
        let wish = Vec3::new(1.0, 0.0, -1.0).normalize();
        let mut velocity = Vec3::new(10.0, 2.0, 0.0);
        motor().air_control(&mut velocity, wish, 12.0, 0.0);
        assert_eq!(velocity, Vec3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn test_air_control_turns_without_losing_speed() {
        let wish = Vec3::new(1.0, 0.0, -1.0).normalize();
        let mut velocity = Vec3::new(10.0, 2.0, 0.0);
        motor().air_control(&mut velocity, wish, 12.0, 1.0);

        assert!(velocity.z < 0.0, "должен повернуть к wish: {velocity:?}");
        assert_abs_diff_eq!(horizontal(velocity).length(), 10.0, epsilon = 1e-3);
        assert_eq!(velocity.y, 2.0);
    }

    #[test]
    fn test_air_control_ignores_opposing_wish() {
        let mut velocity = Vec3::new(10.0, 0.0, 0.0);
        motor().air_control(&mut velocity, Vec3::NEG_X, 12.0, 1.0);
        assert_abs_diff_eq!(velocity.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(velocity.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ground_move_consumes_jump() {
        let mut velocity = Vec3::new(0.0, -7.0, 0.0);
        let mut jump = JumpQueue { wish_jump: true };
        let wish = WishMove {
            direction: Vec3::ZERO,
            speed: 0.0,
        };

        assert!(motor().ground_move(&mut velocity, wish, &mut jump));
        assert_eq!(velocity.y, 10.0);
        assert!(!jump.wish_jump);
    }

    #[test]
    fn test_ground_move_resets_fall_speed() {
        let mut velocity = Vec3::new(0.0, -7.0, 0.0);
        let mut jump = JumpQueue::default();
        let wish = WishMove {
            direction: Vec3::ZERO,
            speed: 0.0,
        };

        assert!(!motor().ground_move(&mut velocity, wish, &mut jump));
        assert_abs_diff_eq!(velocity.y, -20.0 / 60.0, epsilon = 1e-5);
    }

    #[test]
    fn test_air_move_pure_strafe_capped() {
        // wish speed 12 → cap 1, accel 50: min(50 / 60 * 1, 1) = 0.8333
        let cmd = MoveCommand::new(0.0, 1.0);
        let motor = motor();
        let wish = motor.wish(cmd, Quat::IDENTITY);
        let mut velocity = Vec3::ZERO;

        motor.air_move(&mut velocity, cmd, wish);

        assert_abs_diff_eq!(velocity.x, 50.0 / 60.0, epsilon = 1e-4);
        assert_abs_diff_eq!(velocity.y, -20.0 / 60.0, epsilon = 1e-5);
    }

    #[test]
    fn test_air_move_opposing_uses_deceleration() {
        // Летим назад (+Z), жмём вперёд (-Z)
        // friction: 10 → 9.5; accel = air_deceleration 8: 8 / 60 * 12 = 1.6
        let cmd = MoveCommand::new(1.0, 0.0);
        let motor = motor();
        let wish = motor.wish(cmd, Quat::IDENTITY);
        let mut velocity = Vec3::new(0.0, 0.0, 10.0);

        motor.air_move(&mut velocity, cmd, wish);

        assert_abs_diff_eq!(velocity.z, 7.9, epsilon = 1e-3);
        assert_abs_diff_eq!(velocity.x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_wish_vector_follows_yaw() {
        let right_turned = ViewRotation::new(0.0, 90.0).body_rotation();
        let forward = wish_vector(MoveCommand::new(1.0, 0.0), right_turned);
        assert!((forward - Vec3::X).length() < 1e-5, "{forward:?}");

        let strafe = wish_vector(MoveCommand::new(0.0, 1.0), Quat::IDENTITY);
        assert!((strafe - Vec3::X).length() < 1e-5);

        let ahead = wish_vector(MoveCommand::new(1.0, 0.0), Quat::IDENTITY);
        assert!((ahead - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_wish_speed_scales_with_intent() {
        let half = motor().wish(MoveCommand::new(0.5, 0.0), Quat::IDENTITY);
        assert_abs_diff_eq!(half.speed, 6.0, epsilon = 1e-4);

        // Диагональ капается на move_speed
        let wish = motor().wish(MoveCommand::new(1.0, 1.0), Quat::IDENTITY);
        assert_abs_diff_eq!(wish.speed, 12.0, epsilon = 1e-4);
        assert_abs_diff_eq!(wish.direction.length(), 1.0, epsilon = 1e-5);

        let idle = motor().wish(MoveCommand::default(), Quat::IDENTITY);
        assert_eq!(idle.speed, 0.0);
        assert_eq!(idle.direction, Vec3::ZERO);
    }

    #[test]
    fn test_diagonal_ground_run_settles_at_move_speed() {
        let motor = motor();
        let mut jump = JumpQueue::default();
        let mut body = ControlledBody {
            grounded: true,
            ..default()
        };

        for _ in 0..600 {
            motor.step(&mut body, MoveCommand::new(1.0, 1.0), Quat::IDENTITY, &mut jump);
            assert!(body.horizontal_speed() <= 12.0 + 1e-3, "{}", body.horizontal_speed());
        }
        assert!(body.horizontal_speed() > 6.0);
    }

    #[test]
    fn test_idle_ground_friction_stops_within_bound() {
        let motor = motor();
        let mut jump = JumpQueue::default();
        let start = 10.0;
        let mut body = ControlledBody {
            velocity: Vec3::new(start, 0.0, 0.0),
            grounded: true,
            ..default()
        };

        // drop = max(speed, run_deceleration) * friction * dt ≥ 8 * 6 / 60
        let min_drop = 8.0 * 6.0 * DT;
        let bound = (start / min_drop).ceil() as usize;
        let mut previous = body.horizontal_speed();
        for _ in 0..bound {
            motor.step(&mut body, MoveCommand::default(), Quat::IDENTITY, &mut jump);
            let speed = body.horizontal_speed();
            assert!(speed <= previous, "speed went up: {} → {}", previous, speed);
            previous = speed;
        }
        assert_eq!(body.horizontal_speed(), 0.0);

        motor.step(&mut body, MoveCommand::default(), Quat::IDENTITY, &mut jump);
        assert_eq!(body.horizontal_speed(), 0.0);
    }

    #[test]
    fn test_step_picks_mode_from_grounded() {
        let motor = motor();
        let mut jump = JumpQueue::default();

        let mut grounded = ControlledBody {
            velocity: Vec3::new(0.0, -3.0, 0.0),
            grounded: true,
            ..default()
        };
        motor.step(&mut grounded, MoveCommand::default(), Quat::IDENTITY, &mut jump);
        assert_abs_diff_eq!(grounded.velocity.y, -20.0 / 60.0, epsilon = 1e-5);

        let mut airborne = ControlledBody {
            velocity: Vec3::new(0.0, -3.0, 0.0),
            grounded: false,
            ..default()
        };
        motor.step(&mut airborne, MoveCommand::default(), Quat::IDENTITY, &mut jump);
        assert_abs_diff_eq!(airborne.velocity.y, -3.0 - 20.0 / 60.0, epsilon = 1e-5);
    }

    proptest! {
        #[test]
        fn prop_friction_never_flips(
            vx in -100.0f32..100.0,
            vz in -100.0f32..100.0,
            grounded in any::<bool>(),
            scale in 0.0f32..1.0,
        ) {
            let before = Vec3::new(vx, 0.0, vz);
            let mut after = before;
            motor().apply_friction(&mut after, grounded, scale);

            prop_assert!(after.dot(before) >= 0.0);
            prop_assert!(after.length() <= before.length() + 1e-4);
        }

        #[test]
        fn prop_accelerate_noop_when_already_fast(
            speed in 0.0f32..50.0,
            fraction in 0.0f32..0.99,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let wish_dir = Vec3::new(angle.cos(), 0.0, angle.sin());
            let before = wish_dir * speed;
            let mut after = before;
            motor().accelerate(&mut after, wish_dir, speed * fraction, 10.0);
            prop_assert_eq!(after, before);
        }

        #[test]
        fn prop_air_control_noop_without_forward(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            vz in -50.0f32..50.0,
            forward in -0.0009f32..0.0009,
        ) {
            let before = Vec3::new(vx, vy, vz);
            let mut after = before;
            motor().air_control(&mut after, Vec3::NEG_Z, 12.0, forward);
            prop_assert_eq!(after, before);
        }

        #[test]
        fn prop_air_control_preserves_speed(
            vx in -50.0f32..50.0,
            vz in -50.0f32..50.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let before = Vec3::new(vx, 1.0, vz);
            let wish_dir = Vec3::new(angle.cos(), 0.0, angle.sin());
            let mut after = before;
            motor().air_control(&mut after, wish_dir, 12.0, 1.0);

            let expected = horizontal(before).length();
            prop_assert!((horizontal(after).length() - expected).abs() <= 1e-3 * expected.max(1.0));
            prop_assert_eq!(after.y, 1.0);
        }
    }
}
