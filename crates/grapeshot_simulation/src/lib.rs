//! GRAPESHOT Simulation Core
//!
//! Детерминированная fixed-tick симуляция на Bevy 0.16 (headless):
//! - CPM-движение персонажа (Quake 3 CPM(A))
//! - Projectile'ы на ray stepping: отскоки, пробития, взрыв на expire
//! - Filter chain'ы для модификаторов (GrapeShot, Volatile, ...)
//! - Tick-таймеры вместо корутин
//!
//! Коллизии - через `CollisionWorld`: rapier context в движке,
//! `StaticWorld` (аналитическая геометрия) в headless тестах.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod logger;
pub mod modifiers;
pub mod movement;
pub mod physics;
pub mod projectile;
pub mod timers;
pub mod weapon;

// Re-export базовых типов для удобства
pub use combat::{CombatPlugin, DamageDealt, DamageSource, Dead, EntityDied, Explosion, ExplosionConfig, ExplosionTriggered};
pub use components::*;
pub use config::SimulationConfig;
pub use error::SimulationError;
pub use events::{FilterAppExt, FilterChain};
pub use input::{ButtonState, LookSettings, PlayerInput};
pub use logger::{init_logger, LogLevel};
pub use modifiers::{Modifier, ModifierInventory, ModifierPlugin, ModifierStacks};
pub use movement::{MoveSpeedFilter, MovementPlugin, PlayerJumped};
pub use physics::{CollisionLayer, CollisionWorld, HitboxOwner, StaticCollider, StaticWorld};
pub use projectile::{ExpireFilter, ProjectileExpired, ProjectileFired, ProjectileHitEntity, ProjectileHitWall, ProjectilePlugin};
pub use timers::{SimulationTick, TimerQueue};
pub use weapon::{AmmoChanged, FireFilter, Weapon, WeaponPlugin, WeaponSpec};

/// Фазы fixed-тика (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// SimulationTick += 1
    Tick,
    /// Look, intents, CPM, интеграция
    Movement,
    /// Таймеры перезарядки, fire/reload
    Weapons,
    /// Ray stepping projectile'ов
    Projectiles,
    /// Взрывы, смерти
    Combat,
    /// Сброс edge-флагов input
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Читает `SimulationConfig` (если хост его вставил до plugin'а),
/// иначе - defaults. Rapier plugin хост добавляет сам.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        init_logger();
        logger::set_log_level(config.log_level);
        logger::log_info(&format!(
            "Simulation: {} Hz, seed {}",
            config.tick_hz, config.seed
        ));

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            // Детерминистичный RNG (разброс дроби)
            .insert_resource(DeterministicRng::new(config.seed))
            .insert_resource(config.explosion)
            .insert_resource(config)
            .init_resource::<SimulationTick>()
            .register_type::<SimulationTick>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Tick,
                    SimulationSet::Movement,
                    SimulationSet::Weapons,
                    SimulationSet::Projectiles,
                    SimulationSet::Combat,
                    SimulationSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    timers::advance_simulation_tick.in_set(SimulationSet::Tick),
                    input::clear_input_edges.in_set(SimulationSet::Cleanup),
                ),
            )
            // Подсистемы
            .add_plugins((
                MovementPlugin,
                WeaponPlugin,
                ProjectilePlugin,
                CombatPlugin,
                ModifierPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..default()
    })
}

/// Headless App с заданным конфигом
///
/// Время двигается вручную ровно на один timestep за `update()`,
/// поэтому каждый update (кроме первого) = один fixed-тик.
pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    let timestep = Duration::from_secs_f64(1.0 / config.tick_hz);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(timestep))
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    app
}

/// Прогнать `ticks` fixed-тиков (по счётчику SimulationTick)
///
/// Возвращает номер последнего тика.
pub fn advance_ticks(app: &mut App, ticks: u64) -> u64 {
    let target = current_tick(app) + ticks;
    // Первый update не двигает время: запас на warm-up
    let mut budget = ticks * 2 + 4;

    while current_tick(app) < target && budget > 0 {
        app.update();
        budget -= 1;
    }

    current_tick(app)
}

fn current_tick(app: &App) -> u64 {
    app.world()
        .get_resource::<SimulationTick>()
        .map_or(0, |tick| tick.0)
}

/// Spawn helper: управляемый игрок (тело, input, оружие, модификаторы)
pub fn spawn_player(commands: &mut Commands, position: Vec3, config: &SimulationConfig) -> Entity {
    let player = physics::spawn_kinematic_character(commands, position, config.movement);

    commands.entity(player).insert((
        Health::new(config.player_health),
        Weapon::new(config.weapon),
        ModifierInventory::default(),
    ));

    player
}

/// Snapshot мира для сравнения детерминизма
/// (упрощённая версия, полная в bevy_save будет позже)
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
