//! Аналитический collision world для headless симуляции
//!
//! Плоскости (полупространства) и сферы - достаточно для арены,
//! стен и hitbox'ов врагов без rapier. Если ресурс `StaticWorld`
//! вставлен в App, `CollisionQuery` использует его вместо rapier.

use bevy::prelude::*;

use super::collision::{Capsule, CollisionHit, CollisionWorld};
use super::layers::{CollisionLayer, LayerMask};

const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StaticShape {
    /// Полупространство: твёрдое всё, что позади normal.
    /// Луч попадает только в лицевую сторону.
    Plane { point: Vec3, normal: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub entity: Entity,
    pub shape: StaticShape,
    /// None = collider без слоя
    pub layer: Option<CollisionLayer>,
    /// Owner hitbox'а (identity для урона)
    pub owner: Option<Entity>,
}

impl StaticCollider {
    pub fn plane(entity: Entity, point: Vec3, normal: Vec3) -> Self {
        Self {
            entity,
            shape: StaticShape::Plane {
                point,
                normal: normal.normalize_or(Vec3::Y),
            },
            layer: Some(CollisionLayer::Level),
            owner: None,
        }
    }

    pub fn sphere(entity: Entity, center: Vec3, radius: f32, layer: CollisionLayer) -> Self {
        Self {
            entity,
            shape: StaticShape::Sphere { center, radius },
            layer: Some(layer),
            owner: None,
        }
    }

    pub fn with_layer(mut self, layer: Option<CollisionLayer>) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    fn in_mask(&self, mask: LayerMask) -> bool {
        // Collider без слоя всегда под маской - его и ловим как ошибку конфигурации
        self.layer.map_or(true, |layer| mask.contains(layer))
    }

    fn intersect_ray(&self, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3)> {
        match self.shape {
            StaticShape::Plane { point, normal } => {
                let denom = direction.dot(normal);
                if denom > -PARALLEL_EPSILON {
                    return None; // Параллельно или изнутри
                }
                let distance = (point - origin).dot(normal) / denom;
                (distance >= 0.0).then_some((distance, normal))
            }
            StaticShape::Sphere { center, radius } => {
                let offset = origin - center;
                let c = offset.length_squared() - radius * radius;
                if c < 0.0 {
                    return None; // Луч стартует внутри сферы
                }
                let b = offset.dot(direction);
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                let distance = -b - discriminant.sqrt();
                if distance < 0.0 {
                    return None;
                }
                let normal = (origin + direction * distance - center).normalize_or(-direction);
                Some((distance, normal))
            }
        }
    }

    fn supports_capsule(&self, center: Vec3, capsule: Capsule, skin: f32) -> bool {
        match self.shape {
            StaticShape::Plane { point, normal } => {
                if normal.y <= 0.0 {
                    return false; // Потолок/вертикальная стена - не земля
                }
                let support = capsule.radius + capsule.half_height * normal.y.abs();
                let clearance = (center - point).dot(normal) - support;
                clearance <= skin * normal.y
            }
            StaticShape::Sphere {
                center: sphere_center,
                radius,
            } => {
                // Нижняя полусфера капсулы, протянутая вниз на skin
                let start = center - Vec3::Y * capsule.half_height;
                let end = start - Vec3::Y * skin;
                distance_to_segment(sphere_center, start, end) <= radius + capsule.radius
            }
        }
    }
}

fn distance_to_segment(point: Vec3, start: Vec3, end: Vec3) -> f32 {
    let segment = end - start;
    let length_squared = segment.length_squared();
    if length_squared <= f32::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Статический уровень (read-only во время тика)
#[derive(Resource, Debug, Clone, Default)]
pub struct StaticWorld {
    colliders: Vec<StaticCollider>,
}

impl StaticWorld {
    pub fn insert(&mut self, collider: StaticCollider) -> &mut Self {
        self.colliders.push(collider);
        self
    }

    pub fn remove(&mut self, entity: Entity) {
        self.colliders.retain(|c| c.entity != entity);
    }

    /// Переместить сферу (враги двигаются между тиками)
    pub fn move_sphere(&mut self, entity: Entity, new_center: Vec3) {
        for collider in self.colliders.iter_mut().filter(|c| c.entity == entity) {
            if let StaticShape::Sphere { center, .. } = &mut collider.shape {
                *center = new_center;
            }
        }
    }

    pub fn colliders(&self) -> &[StaticCollider] {
        &self.colliders
    }

    /// Пол на высоте y (normal вверх)
    pub fn with_floor(mut self, entity: Entity, height: f32) -> Self {
        self.insert(StaticCollider::plane(entity, Vec3::Y * height, Vec3::Y));
        self
    }
}

impl CollisionWorld for StaticWorld {
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

        self.colliders
            .iter()
            .filter(|c| c.in_mask(mask) && !exclude.contains(&c.entity))
            .filter_map(|c| {
                let (distance, normal) = c.intersect_ray(origin, direction)?;
                (distance <= max_distance).then_some(CollisionHit {
                    distance,
                    point: origin + direction * distance,
                    normal,
                    collider: c.entity,
                    target: c.owner.unwrap_or(c.entity),
                    layer: c.layer,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn probe_ground(&self, body: Entity, center: Vec3, capsule: Capsule, skin: f32) -> bool {
        self.colliders
            .iter()
            .filter(|c| c.entity != body && c.layer == Some(CollisionLayer::Level))
            .any(|c| c.supports_capsule(center, capsule, skin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_ray_hits_wall_front_face() {
        let mut world = StaticWorld::default();
        world.insert(StaticCollider::plane(e(1), Vec3::new(4.0, 0.0, 0.0), Vec3::NEG_X));

        let hit = world
            .cast_ray(Vec3::ZERO, Vec3::X, 10.0, LayerMask::PROJECTILE, &[])
            .expect("wall hit");
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec3::NEG_X);
        assert_eq!(hit.layer, Some(CollisionLayer::Level));

        // Из-за стены (back face) - промах
        assert!(world
            .cast_ray(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X, 10.0, LayerMask::PROJECTILE, &[])
            .is_none());
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let mut world = StaticWorld::default();
        world.insert(StaticCollider::plane(e(1), Vec3::new(4.0, 0.0, 0.0), Vec3::NEG_X));
        assert!(world
            .cast_ray(Vec3::ZERO, Vec3::X, 3.9, LayerMask::PROJECTILE, &[])
            .is_none());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut world = StaticWorld::default();
        world
            .insert(StaticCollider::plane(e(1), Vec3::new(9.0, 0.0, 0.0), Vec3::NEG_X))
            .insert(StaticCollider::sphere(e(2), Vec3::new(5.0, 0.0, 0.0), 1.0, CollisionLayer::Enemy));

        let hit = world
            .cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::PROJECTILE, &[])
            .unwrap();
        assert_eq!(hit.collider, e(2));
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_exclude_and_mask() {
        let mut world = StaticWorld::default();
        world.insert(StaticCollider::sphere(e(2), Vec3::new(5.0, 0.0, 0.0), 1.0, CollisionLayer::Enemy));

        assert!(world
            .cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::PROJECTILE, &[e(2)])
            .is_none());
        assert!(world
            .cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::LEVEL, &[])
            .is_none());
    }

    #[test]
    fn test_hitbox_owner_is_target() {
        let mut world = StaticWorld::default();
        world.insert(
            StaticCollider::sphere(e(3), Vec3::new(0.0, 0.0, -5.0), 0.5, CollisionLayer::Enemy)
                .with_owner(e(10)),
        );

        let hit = world
            .cast_ray(Vec3::ZERO, Vec3::NEG_Z, 20.0, LayerMask::PROJECTILE, &[])
            .unwrap();
        assert_eq!(hit.collider, e(3));
        assert_eq!(hit.target, e(10));
    }

    #[test]
    fn test_ray_from_inside_sphere_misses() {
        let mut world = StaticWorld::default();
        world.insert(StaticCollider::sphere(e(2), Vec3::ZERO, 2.0, CollisionLayer::Enemy));
        assert!(world
            .cast_ray(Vec3::ZERO, Vec3::X, 20.0, LayerMask::PROJECTILE, &[])
            .is_none());
    }

    #[test]
    fn test_probe_ground_on_floor() {
        let world = StaticWorld::default().with_floor(e(1), 0.0);
        let capsule = Capsule::default();

        // Центр капсулы на 0.9 - стоим на полу
        assert!(world.probe_ground(e(5), Vec3::new(0.0, 0.9, 0.0), capsule, 0.05));
        // В пределах skin
        assert!(world.probe_ground(e(5), Vec3::new(0.0, 0.94, 0.0), capsule, 0.05));
        // В воздухе
        assert!(!world.probe_ground(e(5), Vec3::new(0.0, 2.0, 0.0), capsule, 0.05));
    }

    #[test]
    fn test_probe_ground_ignores_walls_and_entities() {
        let mut world = StaticWorld::default();
        world
            .insert(StaticCollider::plane(e(1), Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_X))
            .insert(StaticCollider::sphere(e(2), Vec3::new(0.0, 0.0, 0.0), 1.0, CollisionLayer::Enemy));

        assert!(!world.probe_ground(e(5), Vec3::new(0.0, 1.5, 0.0), Capsule::default(), 0.05));
    }

    #[test]
    fn test_probe_ground_on_level_sphere() {
        let mut world = StaticWorld::default();
        world.insert(StaticCollider::sphere(e(1), Vec3::ZERO, 1.0, CollisionLayer::Level));

        // Низ капсулы (0.9 ниже центра) касается верха сферы
        assert!(world.probe_ground(e(5), Vec3::new(0.0, 1.9, 0.0), Capsule::default(), 0.05));
        assert!(!world.probe_ground(e(5), Vec3::new(0.0, 2.5, 0.0), Capsule::default(), 0.05));
    }
}
