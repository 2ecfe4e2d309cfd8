//! Rapier adapter для `CollisionWorld`
//!
//! Единственное место, где ядро касается rapier query API.
//! Слой и owner hitbox'а читаются из ECS по entity collider'а.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::collision::{Capsule, CollisionHit, CollisionWorld, EmptyWorld, HitboxOwner};
use super::layers::{CollisionLayer, LayerMask};
use super::static_world::StaticWorld;

/// Данные collider'а, нужные ядру
pub type LayerData = (Option<&'static CollisionLayer>, Option<&'static HitboxOwner>);

pub struct RapierCollisionWorld<'a, 'c, 'w, 's> {
    pub context: &'a RapierContext<'c>,
    pub layers: &'a Query<'w, 's, LayerData>,
}

impl RapierCollisionWorld<'_, '_, '_, '_> {
    fn classify(&self, collider: Entity) -> (Entity, Option<CollisionLayer>) {
        match self.layers.get(collider) {
            Ok((layer, owner)) => (owner.map_or(collider, |o| o.0), layer.copied()),
            Err(_) => (collider, None),
        }
    }
}

impl CollisionWorld for RapierCollisionWorld<'_, '_, '_, '_> {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        exclude: &[Entity],
    ) -> Option<CollisionHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let not_excluded = |entity: Entity| !exclude.contains(&entity);
        let filter = QueryFilter::new()
            .exclude_sensors()
            .groups(CollisionGroups::new(Group::ALL, mask.group()))
            .predicate(&not_excluded);

        let (collider, intersection) =
            self.context
                .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)?;

        let (target, layer) = self.classify(collider);
        Some(CollisionHit {
            distance: intersection.time_of_impact,
            point: intersection.point,
            normal: intersection.normal,
            collider,
            target,
            layer,
        })
    }

    fn probe_ground(&self, body: Entity, center: Vec3, capsule: Capsule, skin: f32) -> bool {
        let shape = Collider::capsule_y(capsule.half_height, capsule.radius);
        let filter = QueryFilter::new()
            .exclude_sensors()
            .exclude_collider(body)
            .groups(CollisionGroups::new(Group::ALL, LayerMask::LEVEL.group()));

        self.context
            .cast_shape(
                center,
                Quat::IDENTITY,
                Vec3::NEG_Y,
                &*shape.raw,
                ShapeCastOptions::with_max_time_of_impact(skin),
                filter,
            )
            .is_some()
    }
}

/// SystemParam: активный collision world
///
/// Приоритет: `StaticWorld` ресурс → rapier context → None
/// (нет мира - ray cast'ить не во что).
#[derive(SystemParam)]
pub struct CollisionQuery<'w, 's> {
    static_world: Option<Res<'w, StaticWorld>>,
    rapier: ReadRapierContext<'w, 's>,
    layers: Query<'w, 's, LayerData>,
}

impl CollisionQuery<'_, '_> {
    pub fn with_world<R>(&self, f: impl FnOnce(&dyn CollisionWorld) -> R) -> Option<R> {
        if let Some(world) = self.static_world.as_deref() {
            return Some(f(world));
        }

        let context = self.rapier.single().ok()?;
        let world = RapierCollisionWorld {
            context: &context,
            layers: &self.layers,
        };
        Some(f(&world))
    }

    /// Как `with_world`, но без мира ядро получает `EmptyWorld`
    pub fn with_world_or_empty<R>(&self, f: impl FnOnce(&dyn CollisionWorld) -> R) -> R {
        if let Some(world) = self.static_world.as_deref() {
            return f(world);
        }

        match self.rapier.single() {
            Ok(context) => f(&RapierCollisionWorld {
                context: &context,
                layers: &self.layers,
            }),
            Err(_) => f(&EmptyWorld),
        }
    }
}
