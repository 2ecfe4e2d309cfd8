//! Projectile systems (FixedUpdate)

use bevy::prelude::*;

use super::events::{ExpireFilter, ProjectileExpired, ProjectileFired, ProjectileHitEntity, ProjectileHitWall};
use super::simulator::{DamageSink, ExpireReason, ProjectileNotice, StepOutcome};
use crate::combat::{DamageDealt, DamageSource, ExplosionTriggered};
use crate::components::{Health, Projectile};
use crate::error::SimulationError;
use crate::events::FilterChain;
use crate::physics::CollisionQuery;

/// Damage sink поверх ECS Health
///
/// Реально снятое HP копится в `dealt` → DamageDealt events.
pub struct HealthSink<'a, 'w, 's> {
    pub health: &'a mut Query<'w, 's, &'static mut Health>,
    pub attacker: Option<Entity>,
    pub projectile: Entity,
    pub dealt: Vec<DamageDealt>,
}

impl DamageSink for HealthSink<'_, '_, '_> {
    fn apply_damage(&mut self, target: Entity, amount: f32) -> Result<(), SimulationError> {
        let mut health = self
            .health
            .get_mut(target)
            .map_err(|_| SimulationError::MissingDamageable { target })?;

        let applied = health.take_damage(amount);
        // Труп урона не получает
        if applied <= 0.0 {
            return Ok(());
        }
        self.dealt.push(DamageDealt {
            attacker: self.attacker,
            target,
            amount: applied,
            source: DamageSource::Projectile(self.projectile),
        });
        Ok(())
    }
}

/// Spawn helper: projectile с Transform, смотрящим по heading
pub fn spawn_projectile(commands: &mut Commands, origin: Vec3, projectile: Projectile) -> Entity {
    let transform = Transform::from_translation(origin).looking_to(projectile.heading, Vec3::Y);

    commands.spawn((transform, projectile)).id()
}

/// Система: ProjectileFired для projectile'ов, появившихся с прошлого тика
pub fn announce_fired_projectiles(
    projectiles: Query<(Entity, &Projectile, &Transform), Added<Projectile>>,
    mut fired: EventWriter<ProjectileFired>,
) {
    for (entity, projectile, transform) in projectiles.iter() {
        fired.write(ProjectileFired {
            projectile: entity,
            shooter: projectile.shooter,
            origin: transform.translation,
            heading: projectile.heading,
        });
    }
}

/// Система: шаг всех projectile'ов + expire
///
/// Ошибка конфигурации (слой без CollisionLayer, цель без Health)
/// прерывает систему: это баг сцены, а не runtime-ситуация.
#[allow(clippy::too_many_arguments)]
pub fn step_projectiles(
    mut commands: Commands,
    collision: CollisionQuery,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    // 'static: HealthSink держит Query<.., &'static mut Health>
    mut health: Query<&'static mut Health>,
    expire_chain: Res<FilterChain<ExpireFilter>>,
    time: Res<Time<Fixed>>,
    mut hit_walls: EventWriter<ProjectileHitWall>,
    mut hit_entities: EventWriter<ProjectileHitEntity>,
    mut expired: EventWriter<ProjectileExpired>,
    mut explosions: EventWriter<ExplosionTriggered>,
    mut damage_dealt: EventWriter<DamageDealt>,
) -> Result {
    let delta = time.delta_secs();
    let mut notices = Vec::new();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        notices.clear();
        let mut position = transform.translation;
        let mut sink = HealthSink {
            health: &mut health,
            attacker: projectile.shooter,
            projectile: entity,
            dealt: Vec::new(),
        };

        let outcome = collision.with_world_or_empty(|world| {
            projectile.step(&mut position, delta, world, &mut sink, &mut notices)
        });
        let dealt = std::mem::take(&mut sink.dealt);
        let outcome = outcome.inspect_err(|e| {
            crate::logger::log_error(&format!("Projectile {:?}: {}", entity, e));
        })?;

        transform.translation = position;
        transform.look_to(projectile.heading, Vec3::Y);

        damage_dealt.write_batch(dealt);
        for notice in notices.iter().copied() {
            match notice {
                ProjectileNotice::HitWall {
                    collider,
                    point,
                    normal,
                } => {
                    hit_walls.write(ProjectileHitWall {
                        projectile: entity,
                        collider,
                        point,
                        normal,
                    });
                }
                ProjectileNotice::HitEntity {
                    collider,
                    target,
                    layer,
                    point,
                    damaged,
                } => {
                    hit_entities.write(ProjectileHitEntity {
                        projectile: entity,
                        shooter: projectile.shooter,
                        target,
                        collider,
                        layer,
                        point,
                        damaged,
                    });
                }
            }
        }

        let StepOutcome::Expired(reason) = outcome else {
            continue;
        };

        let context = expire_chain.apply(ExpireFilter {
            projectile: entity,
            shooter: projectile.shooter,
            expired_on_hit: reason == ExpireReason::Hit,
            position,
            explosion_power: projectile.stats.base_explosion_power,
            modifiers: projectile.modifiers,
        });
        let power = context.explosion_power.max(0);

        expired.write(ProjectileExpired {
            projectile: entity,
            shooter: projectile.shooter,
            position,
            on_hit: reason == ExpireReason::Hit,
            explosion_power: power,
        });

        if power > 0 {
            explosions.write(ExplosionTriggered {
                position,
                power,
                instigator: projectile.shooter,
            });
        }

        crate::logger::log(&format!(
            "Projectile {:?} expired ({:?}) at {:?}, traveled {:.2}, explosion power {}",
            entity, reason, position, projectile.distance_traveled, power
        ));

        commands.entity(entity).despawn();
    }

    Ok(())
}
