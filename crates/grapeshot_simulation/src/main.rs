//! Headless симуляция GRAPESHOT
//!
//! Арена без rapier: пол, дальняя стена, два врага-сферы.
//! Игрок с двумя GrapeShot и Volatile стреляет каждые 40 тиков.
//!
//! Usage: grapeshot_simulation [config.toml]

use bevy::prelude::*;
use std::path::Path;

use grapeshot_simulation::logger::{log_error, log_info};
use grapeshot_simulation::{
    advance_ticks, create_headless_app_with_config, spawn_player, CollisionLayer, EntityDied, Health, Modifier,
    ModifierInventory, PlayerInput, ProjectileExpired, SimulationConfig, StaticCollider, StaticWorld, Weapon,
};

const TICKS: u64 = 600;
const FIRE_EVERY: u64 = 40;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                grapeshot_simulation::init_logger();
                log_error(&format!("{}", e));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let mut app = create_headless_app_with_config(config.clone());
    let (player, enemies) = build_arena(app.world_mut(), &config);

    let mut died = app.world().resource::<Events<EntityDied>>().get_cursor();
    let mut expired = app.world().resource::<Events<ProjectileExpired>>().get_cursor();

    let mut tick = 0;
    while tick < TICKS {
        if tick % FIRE_EVERY == 0 {
            if let Some(mut input) = app.world_mut().get_mut::<PlayerInput>(player) {
                input.fire.release();
                input.fire.press();
            }
        }

        tick = advance_ticks(&mut app, 1);

        let world = app.world_mut();
        let deaths: Vec<Entity> = died
            .read(world.resource::<Events<EntityDied>>())
            .map(|event| event.entity)
            .collect();
        if let Some(mut level) = world.get_resource_mut::<StaticWorld>() {
            // Труп больше не ловит дробь
            for entity in &deaths {
                level.remove(*entity);
            }
        }
        for entity in deaths {
            log_info(&format!("Tick {}: {:?} died", tick, entity));
        }

        let world = app.world();
        for event in expired.read(world.resource::<Events<ProjectileExpired>>()) {
            if event.explosion_power > 0 {
                log_info(&format!(
                    "Tick {}: projectile exploded at {:?} (power {})",
                    tick, event.position, event.explosion_power
                ));
            }
        }
    }

    let world = app.world();
    for enemy in enemies {
        let health = world.get::<Health>(enemy).map_or(0.0, |h| h.current);
        log_info(&format!("Enemy {:?}: {:.1} HP", enemy, health));
    }
    if let Some(weapon) = world.get::<Weapon>(player) {
        log_info(&format!(
            "Player ammo {}/{}",
            weapon.current_ammo, weapon.spec.magazine_size
        ));
    }
    log_info("Simulation complete!");
}

fn build_arena(world: &mut World, config: &SimulationConfig) -> (Entity, Vec<Entity>) {
    let floor = world.spawn_empty().id();
    let back_wall = world.spawn_empty().id();

    let mut level = StaticWorld::default().with_floor(floor, 0.0);
    level.insert(StaticCollider::plane(back_wall, Vec3::new(0.0, 0.0, -14.0), Vec3::Z));

    let mut enemies = Vec::new();
    for position in [Vec3::new(-1.5, 1.0, -9.0), Vec3::new(1.0, 1.0, -11.0)] {
        let enemy = world
            .spawn((Transform::from_translation(position), Health::new(40.0), CollisionLayer::Enemy))
            .id();
        level.insert(StaticCollider::sphere(enemy, position, 0.6, CollisionLayer::Enemy));
        enemies.push(enemy);
    }
    world.insert_resource(level);

    // Капсула стоит на полу: center = half_height + radius
    let player = {
        let mut commands = world.commands();
        spawn_player(&mut commands, Vec3::new(0.0, 0.9, 0.0), config)
    };
    world.flush();

    if let Some(mut inventory) = world.get_mut::<ModifierInventory>(player) {
        inventory.equip(Modifier::GrapeShot);
        inventory.equip(Modifier::GrapeShot);
        inventory.equip(Modifier::Volatile);
    }

    (player, enemies)
}
