//! Movement systems (FixedUpdate)
//!
//! Порядок внутри тика (chain):
//! look → intents → move speed filter → ground → CPM → integrate → view sync

use bevy::prelude::*;

use super::cpm::CpmMotor;
use super::events::{MoveSpeedFilter, PlayerJumped};
use crate::combat::Dead;
use crate::components::{ControlledBody, JumpQueue, MoveCommand, MovementBase, MovementTuning, PlayerView, ViewRotation};
use crate::events::FilterChain;
use crate::input::{LookSettings, PlayerInput};
use crate::modifiers::ModifierInventory;

/// Система: mouse delta → ViewRotation, yaw → Transform тела
pub fn apply_look_input(
    mut query: Query<(&PlayerInput, &LookSettings, &mut ViewRotation, &mut Transform), Without<Dead>>,
) {
    for (input, settings, mut view, mut transform) in query.iter_mut() {
        view.apply_look(input.look_delta, settings);
        transform.rotation = view.body_rotation();
    }
}

/// Система: PlayerInput → MoveCommand + очередь прыжка
pub fn queue_movement_intents(
    mut query: Query<(&PlayerInput, &MovementTuning, &mut MoveCommand, &mut JumpQueue), Without<Dead>>,
) {
    for (input, tuning, mut command, mut jump) in query.iter_mut() {
        // Диагональ не быстрее прямого хода
        let axis = input.move_axis.clamp_length_max(1.0);
        *command = MoveCommand::new(axis.y, axis.x);
        jump.update(input.jump, tuning.hold_jump_to_bhop);
    }
}

/// Система: прогон base-значений через MoveSpeedFilter chain
///
/// Результат клампится в ≥ 0 (фильтр не может сделать скорость отрицательной).
pub fn refresh_move_speed(
    chain: Res<FilterChain<MoveSpeedFilter>>,
    mut query: Query<(
        Entity,
        &MovementBase,
        &mut MovementTuning,
        Option<&ModifierInventory>,
    )>,
) {
    for (entity, base, mut tuning, inventory) in query.iter_mut() {
        let modifiers = inventory.map(ModifierInventory::stacks).unwrap_or_default();
        let result = chain.apply(MoveSpeedFilter::new(entity, base).with_modifiers(modifiers));
        tuning.move_speed = result.move_speed.max(0.0);
        tuning.side_strafe_speed = result.side_strafe_speed.max(0.0);
        tuning.run_acceleration = result.run_acceleration.max(0.0);
    }
}

/// Система: CPM шаг (одна мутация velocity за тик)
pub fn cpm_movement(
    mut query: Query<
        (
            Entity,
            &Transform,
            &MovementTuning,
            &MoveCommand,
            &ViewRotation,
            &mut ControlledBody,
            &mut JumpQueue,
        ),
        Without<Dead>,
    >,
    mut jumped: EventWriter<PlayerJumped>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, tuning, command, view, mut body, mut jump) in query.iter_mut() {
        let motor = CpmMotor::new(*tuning, delta);
        if motor.step(&mut body, *command, view.body_rotation(), &mut jump) {
            jumped.write(PlayerJumped {
                entity,
                position: transform.translation,
            });
        }
        body.track_top_speed();
    }
}

/// Система: камера следует за телом (после integrate, без отставания на тик)
pub fn sync_player_view(mut query: Query<(&Transform, &ViewRotation, &mut PlayerView)>) {
    for (transform, view, mut player_view) in query.iter_mut() {
        player_view.translation = transform.translation + Vec3::Y * player_view.y_offset;
        player_view.rotation = view.view_rotation();
    }
}
