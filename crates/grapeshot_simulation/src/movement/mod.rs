//! Movement domain - CPM контроллер персонажа
//!
//! Содержит:
//! - CpmMotor (friction / accelerate / air control, чистые функции)
//! - JumpQueue::update (Q3 очередь прыжка)
//! - Системы: look, intents, move-speed filter, CPM step, view sync
//! - PlayerJumped event, MoveSpeedFilter context

use bevy::prelude::*;

use crate::events::FilterAppExt;
use crate::physics::{detect_ground, integrate_velocity};
use crate::SimulationSet;

pub mod cpm;
pub mod events;
pub mod jump;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod cpm_tests;

// Re-export all components and events
pub use cpm::*;
pub use events::*;
pub use systems::*;

/// Plugin движения персонажа
///
/// Регистрирует все системы в FixedUpdate для детерминизма.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PlayerJumped>()
            .init_filter::<MoveSpeedFilter>()
            .add_systems(
                FixedUpdate,
                (
                    apply_look_input,
                    queue_movement_intents,
                    refresh_move_speed,
                    detect_ground,
                    cpm_movement,
                    integrate_velocity,
                    sync_player_view,
                )
                    .chain() // Последовательное выполнение
                    .in_set(SimulationSet::Movement),
            );
    }
}
