//! Kinematic тело персонажа
//!
//! Архитектура:
//! - Velocity считает CPM motor (movement), не rapier forces
//! - Ground contact: capsule cast вниз на skin против Level
//! - Интеграция: через `KinematicCharacterController` если есть,
//!   иначе напрямую в Transform (headless)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision::Capsule;
use super::layers::{CollisionLayer, LayerMask};
use super::rapier_world::CollisionQuery;
use crate::combat::Dead;
use crate::components::{ControlledBody, JumpQueue, MoveCommand, MovementBase, MovementTuning, PlayerView, ViewRotation};
use crate::input::{LookSettings, PlayerInput};

/// Kinematic тело: размеры капсулы + skin для ground probe
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    pub capsule: Capsule,
    /// Дистанция capsule cast'а вниз
    pub skin: f32,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            capsule: Capsule::default(),
            skin: 0.05,
        }
    }
}

/// Система: пересчёт `grounded` из ground probe
///
/// Без collision world флаг не трогаем.
pub fn detect_ground(
    collision: CollisionQuery,
    mut bodies: Query<(Entity, &Transform, &KinematicBody, &mut ControlledBody), Without<Dead>>,
) {
    for (entity, transform, kinematic, mut body) in bodies.iter_mut() {
        let grounded = collision.with_world(|world| {
            world.probe_ground(entity, transform.translation, kinematic.capsule, kinematic.skin)
        });
        if let Some(grounded) = grounded {
            body.grounded = grounded;
        }
    }
}

/// Система интеграции velocity → position
///
/// С `KinematicCharacterController` смещение отдаётся rapier'у (он же
/// разруливает стены). Headless: прямая интеграция + выталкивание из пола.
pub fn integrate_velocity(
    collision: CollisionQuery,
    mut bodies: Query<
        (
            Entity,
            &ControlledBody,
            &KinematicBody,
            &mut Transform,
            Option<&mut KinematicCharacterController>,
        ),
        Without<Dead>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, body, kinematic, mut transform, controller) in bodies.iter_mut() {
        let displacement = body.velocity * delta;

        if let Some(mut controller) = controller {
            controller.translation = Some(displacement);
            continue;
        }

        transform.translation += displacement;

        // Низ капсулы не уходит под Level
        let foot = kinematic.capsule.half_height + kinematic.capsule.radius;
        let floor = collision
            .with_world(|world| {
                world.cast_ray(
                    transform.translation + Vec3::Y * foot,
                    Vec3::NEG_Y,
                    foot * 2.0,
                    LayerMask::LEVEL,
                    &[entity],
                )
            })
            .flatten();
        if let Some(hit) = floor {
            transform.translation.y = transform.translation.y.max(hit.point.y + foot);
        }
    }
}

/// Spawn helper для kinematic персонажа (игрок)
///
/// Создает entity с полным набором компонентов:
/// - Transform
/// - CPM: ControlledBody, ViewRotation, MovementTuning + MovementBase, JumpQueue
/// - Input: PlayerInput, LookSettings
/// - Rapier: Collider (capsule) + collision groups слоя Player
pub fn spawn_kinematic_character(commands: &mut Commands, position: Vec3, tuning: MovementTuning) -> Entity {
    let kinematic = KinematicBody::default();

    commands
        .spawn((
            Transform::from_translation(position),
            kinematic,
            ControlledBody::default(),
            ViewRotation::default(),
            MovementBase::from(&tuning),
            tuning,
            MoveCommand::default(),
            JumpQueue::default(),
            PlayerView::default(),
            PlayerInput::default(),
            LookSettings::default(),
            CollisionLayer::Player,
            Collider::capsule_y(kinematic.capsule.half_height, kinematic.capsule.radius),
            CollisionLayer::Player.groups(),
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{StaticCollider, StaticWorld};
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn setup(world: StaticWorld) -> App {
        let mut app = App::new();
        app.insert_resource(world);
        app.insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(100)));
        app
    }

    fn advance_fixed(app: &mut App) {
        // Time<Fixed> delta выставляется вручную: системы вызываются напрямую
        let step = app.world().resource::<Time<Fixed>>().timestep();
        app.world_mut().resource_mut::<Time<Fixed>>().advance_by(step);
    }

    #[test]
    fn test_detect_ground_on_floor() {
        let floor = Entity::from_raw(1000);
        let mut app = setup(StaticWorld::default().with_floor(floor, 0.0));

        let standing = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 0.9, 0.0), KinematicBody::default(), ControlledBody::default()))
            .id();
        let flying = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 5.0, 0.0),
                KinematicBody::default(),
                ControlledBody {
                    grounded: true,
                    ..default()
                },
            ))
            .id();

        app.world_mut().run_system_once(detect_ground).unwrap();

        assert!(app.world().get::<ControlledBody>(standing).unwrap().grounded);
        assert!(!app.world().get::<ControlledBody>(flying).unwrap().grounded);
    }

    #[test]
    fn test_integrate_moves_transform() {
        let mut app = setup(StaticWorld::default());
        advance_fixed(&mut app);

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                KinematicBody::default(),
                ControlledBody {
                    velocity: Vec3::new(10.0, 0.0, -5.0),
                    ..default()
                },
            ))
            .id();

        app.world_mut().run_system_once(integrate_velocity).unwrap();

        let translation = app.world().get::<Transform>(entity).unwrap().translation;
        assert!((translation - Vec3::new(1.0, 0.0, -0.5)).length() < 1e-5, "{translation:?}");
    }

    #[test]
    fn test_integrate_does_not_sink_into_floor() {
        let floor = Entity::from_raw(1000);
        let mut app = setup(StaticWorld::default().with_floor(floor, 0.0));
        advance_fixed(&mut app);

        let entity = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 0.95, 0.0),
                KinematicBody::default(),
                ControlledBody {
                    velocity: Vec3::new(0.0, -10.0, 0.0),
                    ..default()
                },
            ))
            .id();

        app.world_mut().run_system_once(integrate_velocity).unwrap();

        let translation = app.world().get::<Transform>(entity).unwrap().translation;
        assert!((translation.y - 0.9).abs() < 1e-5, "y = {}", translation.y);
    }

    #[test]
    fn test_dead_bodies_do_not_move() {
        let mut app = setup(StaticWorld::default());
        advance_fixed(&mut app);

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                KinematicBody::default(),
                ControlledBody {
                    velocity: Vec3::X * 10.0,
                    ..default()
                },
                Dead,
            ))
            .id();

        app.world_mut().run_system_once(integrate_velocity).unwrap();
        assert_eq!(app.world().get::<Transform>(entity).unwrap().translation, Vec3::ZERO);
    }

    #[test]
    fn test_level_sphere_supports_body() {
        let mut world = StaticWorld::default();
        world.insert(StaticCollider::sphere(Entity::from_raw(1000), Vec3::ZERO, 1.0, CollisionLayer::Level));
        let mut app = setup(world);

        let entity = app
            .world_mut()
            .spawn((Transform::from_xyz(0.0, 1.9, 0.0), KinematicBody::default(), ControlledBody::default()))
            .id();

        app.world_mut().run_system_once(detect_ground).unwrap();
        assert!(app.world().get::<ControlledBody>(entity).unwrap().grounded);
    }
}
