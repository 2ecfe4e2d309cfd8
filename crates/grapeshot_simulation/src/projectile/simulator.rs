//! Projectile ray stepping
//!
//! Один вызов `Projectile::step` = один fixed тик одного projectile'а.
//! Коллизии разрешаются строго по дистанции (ближайшая первой), пока
//! не кончится бюджет тика `speed × dt`. Collision world и damage
//! приходят снаружи, ядро ничего не ищет само.

use bevy::prelude::*;

use crate::components::Projectile;
use crate::error::SimulationError;
use crate::physics::{reflect, CollisionLayer, CollisionWorld};

/// Отступ от стены после отскока (ray из точки на поверхности не должен
/// сразу же попасть в неё же)
pub const SURFACE_OFFSET: f32 = 1e-4;

/// Получатель урона
pub trait DamageSink {
    /// Ошибка `MissingDamageable`, если у цели нет Health
    fn apply_damage(&mut self, target: Entity, amount: f32) -> Result<(), SimulationError>;
}

/// Что произошло за тик (в порядке разрешения)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileNotice {
    HitWall {
        collider: Entity,
        point: Vec3,
        normal: Vec3,
    },
    HitEntity {
        collider: Entity,
        target: Entity,
        layer: CollisionLayer,
        point: Vec3,
        damaged: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireReason {
    /// Отскок или пробитие сверх бюджета
    Hit,
    /// Кончилась дальность
    RangeExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Flying,
    Expired(ExpireReason),
}

impl StepOutcome {
    pub fn is_expired(self) -> bool {
        matches!(self, StepOutcome::Expired(_))
    }
}

impl Projectile {
    /// Один тик полёта
    ///
    /// `position` сдвигается на пройденный путь (до точки expire, если он случился).
    pub fn step(
        &mut self,
        position: &mut Vec3,
        dt: f32,
        world: &dyn CollisionWorld,
        damage: &mut dyn DamageSink,
        notices: &mut Vec<ProjectileNotice>,
    ) -> Result<StepOutcome, SimulationError> {
        self.stats.clamp_to_floors();

        let mut remaining = self.stats.speed * dt.max(0.0);

        loop {
            // Стрелок неуязвим для своей дроби только до первого отскока
            let shooter = self.shooter.filter(|_| self.total_bounces == 0);
            let exclude: Vec<Entity> = shooter.into_iter().chain(self.passing_through).collect();
            let Some(hit) = world.cast_ray(*position, self.heading, remaining, self.mask, &exclude) else {
                break;
            };
            // Попадание за пределами дальности не считается
            if hit.distance >= self.remaining_range() {
                break;
            }

            let layer = hit.layer.ok_or(SimulationError::UnclassifiedLayer {
                collider: hit.collider,
            })?;

            *position += self.heading * hit.distance;
            self.distance_traveled += hit.distance;
            remaining -= hit.distance;

            if layer.is_damageable() {
                let damaged = self.damage_once(hit.target, damage)?;
                notices.push(ProjectileNotice::HitEntity {
                    collider: hit.collider,
                    target: hit.target,
                    layer,
                    point: hit.point,
                    damaged,
                });

                self.total_pierces += 1;
                if self.total_pierces > self.stats.pierces {
                    return Ok(StepOutcome::Expired(ExpireReason::Hit));
                }
                self.passing_through = Some(hit.collider);
            } else {
                self.heading = reflect(self.heading, hit.normal).normalize_or(-self.heading);
                *position += hit.normal * SURFACE_OFFSET;
                notices.push(ProjectileNotice::HitWall {
                    collider: hit.collider,
                    point: hit.point,
                    normal: hit.normal,
                });

                self.total_bounces += 1;
                if self.total_bounces > self.stats.bounces {
                    return Ok(StepOutcome::Expired(ExpireReason::Hit));
                }

                // Новая эпоха: после отскока цель можно задеть снова
                self.damaged.clear();
                self.passing_through = None;
            }
        }

        if remaining > self.remaining_range() {
            return Ok(StepOutcome::Expired(ExpireReason::RangeExhausted));
        }

        *position += self.heading * remaining;
        self.distance_traveled += remaining;
        Ok(StepOutcome::Flying)
    }

    /// Урон не больше одного раза за эпоху. Возвращает true, если урон нанесён.
    fn damage_once(&mut self, target: Entity, sink: &mut dyn DamageSink) -> Result<bool, SimulationError> {
        if self.damaged.contains(&target) {
            return Ok(false);
        }

        sink.apply_damage(target, self.stats.damage)?;
        self.damaged.insert(target);
        Ok(true)
    }
}
