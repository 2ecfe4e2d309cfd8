//! Weapon systems (FixedUpdate)
//!
//! Порядок внутри тика:
//! 1. complete_reloads - созревшие таймеры → полный магазин
//! 2. handle_weapon_input - fire (FireFilter chain → projectile'ы), потом reload

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::components::{BufferedPress, Weapon};
use super::events::{AmmoChanged, FireFilter, ReloadStarted, WeaponTimer};
use crate::combat::Dead;
use crate::components::{PlayerView, Projectile, ViewRotation};
use crate::events::FilterChain;
use crate::input::PlayerInput;
use crate::modifiers::{ModifierInventory, ModifierStacks};
use crate::projectile::spawn_projectile;
use crate::timers::{secs_to_ticks, SimulationTick, TimerQueue};
use crate::DeterministicRng;

/// Частота fixed-тика из timestep
pub(crate) fn fixed_tick_hz(time: &Time<Fixed>) -> f64 {
    let step = time.timestep().as_secs_f64();
    if step > 0.0 {
        1.0 / step
    } else {
        60.0
    }
}

/// Направление одной дробины: взгляд ± случайный yaw/pitch в пределах spread
pub fn pellet_direction(view: &ViewRotation, spread_degrees: f32, rng: &mut ChaCha8Rng) -> Vec3 {
    if spread_degrees <= 0.0 {
        return view.forward();
    }

    let yaw = rng.gen_range(-spread_degrees..=spread_degrees);
    let pitch = rng.gen_range(-spread_degrees..=spread_degrees);
    ViewRotation::new(view.pitch + pitch, view.yaw + yaw).forward()
}

/// Система: конец перезарядки по TimerQueue
pub fn complete_reloads(
    tick: Res<SimulationTick>,
    mut timers: ResMut<TimerQueue<WeaponTimer>>,
    mut weapons: Query<&mut Weapon>,
    mut ammo_events: EventWriter<AmmoChanged>,
) {
    for timer in timers.poll(tick.0) {
        let WeaponTimer::ReloadComplete { shooter } = timer;

        // Стрелок мог исчезнуть за время перезарядки
        let Ok(mut weapon) = weapons.get_mut(shooter) else {
            continue;
        };
        if !weapon.reloading {
            continue;
        }

        weapon.refill();
        ammo_events.write(AmmoChanged {
            shooter,
            current: weapon.current_ammo,
            magazine_size: weapon.spec.magazine_size,
        });

        crate::logger::log(&format!("Reload complete: {:?} ({} rounds)", shooter, weapon.current_ammo));
    }
}

/// Система: нажатия fire/reload → выстрел / перезарядка
///
/// Нажатие, пока оружие занято, буферизуется на `input_buffer` секунд.
/// Последний патрон ставит перезарядку в авто-очередь.
#[allow(clippy::too_many_arguments)]
pub fn handle_weapon_input(
    mut commands: Commands,
    tick: Res<SimulationTick>,
    time: Res<Time<Fixed>>,
    fire_chain: Res<FilterChain<FireFilter>>,
    mut rng: ResMut<DeterministicRng>,
    mut timers: ResMut<TimerQueue<WeaponTimer>>,
    mut shooters: Query<
        (
            Entity,
            &mut Weapon,
            &PlayerInput,
            &Transform,
            &ViewRotation,
            Option<&PlayerView>,
            Option<&ModifierInventory>,
        ),
        Without<Dead>,
    >,
    mut ammo_events: EventWriter<AmmoChanged>,
    mut reload_events: EventWriter<ReloadStarted>,
) {
    let now = tick.0;
    let tick_hz = fixed_tick_hz(&time);

    for (entity, mut weapon, input, transform, view, player_view, inventory) in shooters.iter_mut() {
        let window = secs_to_ticks(weapon.spec.input_buffer, tick_hz);

        // === Fire ===
        let fire_pressed = input.fire.just_pressed;
        if (fire_pressed || weapon.queued_fire.is_active(now, window)) && weapon.can_fire() {
            if weapon.is_busy(now) {
                if fire_pressed {
                    weapon.queued_fire = BufferedPress::At(now);
                }
            } else {
                let eye = transform.translation + Vec3::Y * player_view.map_or(0.0, |v| v.y_offset);
                let modifiers = inventory.map(ModifierInventory::stacks).unwrap_or_default();

                fire(
                    &mut commands,
                    &fire_chain,
                    &mut rng.rng,
                    entity,
                    &weapon,
                    eye,
                    view,
                    modifiers,
                );

                weapon.current_ammo -= 1;
                weapon.cooldown_until = now + secs_to_ticks(weapon.spec.fire_interval, tick_hz);
                if !weapon.can_fire() {
                    weapon.queued_reload = BufferedPress::Sticky;
                }
                weapon.queued_fire = BufferedPress::None;

                ammo_events.write(AmmoChanged {
                    shooter: entity,
                    current: weapon.current_ammo,
                    magazine_size: weapon.spec.magazine_size,
                });
            }
        }

        // === Reload ===
        let reload_pressed = input.reload.just_pressed;
        if (reload_pressed || weapon.queued_reload.is_active(now, window)) && weapon.can_reload() {
            if weapon.is_busy(now) {
                if reload_pressed {
                    weapon.queued_reload = BufferedPress::At(now);
                }
            } else {
                weapon.reloading = true;
                weapon.queued_reload = BufferedPress::None;

                let delay = secs_to_ticks(weapon.spec.reload_duration, tick_hz);
                timers.schedule(now, delay, WeaponTimer::ReloadComplete { shooter: entity });
                reload_events.write(ReloadStarted {
                    shooter: entity,
                    completes_at: now + delay,
                });

                crate::logger::log(&format!("Reload started: {:?} (ready at tick {})", entity, now + delay));
            }
        }
    }
}

/// Один выстрел: FireFilter chain → N projectile'ов
#[allow(clippy::too_many_arguments)]
fn fire(
    commands: &mut Commands,
    fire_chain: &FilterChain<FireFilter>,
    rng: &mut ChaCha8Rng,
    shooter: Entity,
    weapon: &Weapon,
    eye: Vec3,
    view: &ViewRotation,
    modifiers: ModifierStacks,
) {
    let context = fire_chain.apply(FireFilter {
        shooter,
        stats: weapon.spec.projectile,
        pellets: weapon.spec.pellets,
        spread_degrees: weapon.spec.spread_degrees,
        modifiers,
    });
    let pellets = context.pellets.max(1);
    let spread = context.spread_degrees.max(0.0);
    let origin = eye + view.forward() * weapon.spec.muzzle_distance;

    for _ in 0..pellets {
        let heading = pellet_direction(view, spread, rng);
        let projectile = Projectile::new(context.stats, heading, Some(shooter)).with_modifiers(modifiers);
        spawn_projectile(commands, origin, projectile);
    }

    crate::logger::log(&format!(
        "{:?} fired {} pellet(s), spread {:.1}°, ammo left {}",
        shooter,
        pellets,
        spread,
        weapon.current_ammo.saturating_sub(1)
    ));
}
