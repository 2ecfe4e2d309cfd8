//! Weapon domain - магазин, cooldown, буфер нажатий, перезарядка
//!
//! ECS ответственность:
//! - State: `Weapon` на entity стрелка (ammo, cooldown, очереди нажатий)
//! - Fire: FireFilter chain → projectile'ы (разброс из DeterministicRng)
//! - Reload: конец перезарядки - one-shot таймер в `TimerQueue<WeaponTimer>`
//!
//! Время - в тиках `SimulationTick`, секунды конвертируются по Time<Fixed>.

use bevy::prelude::*;

use crate::events::FilterAppExt;
use crate::timers::TimerQueue;
use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod systems;


pub use components::*;
pub use events::*;
pub use systems::*;

/// Weapon Plugin
///
/// Порядок выполнения (SimulationSet::Weapons, после movement -
/// стреляем из актуальной позиции камеры):
/// 1. complete_reloads
/// 2. handle_weapon_input
pub struct WeaponPlugin;

impl Plugin for WeaponPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Weapon>()
            .add_event::<AmmoChanged>()
            .add_event::<ReloadStarted>()
            .init_resource::<TimerQueue<WeaponTimer>>()
            .init_filter::<FireFilter>()
            .add_systems(
                FixedUpdate,
                (complete_reloads, handle_weapon_input)
                    .chain()
                    .in_set(SimulationSet::Weapons),
            );
    }
}
