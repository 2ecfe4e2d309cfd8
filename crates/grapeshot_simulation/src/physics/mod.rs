//! Physics module
//!
//! Kinematic тело, collision layers, collision world (rapier / static).
//! Ядро симуляции видит только `CollisionWorld` trait.

pub mod collision;
pub mod kinematic;
pub mod layers;
pub mod rapier_world;
pub mod static_world;

// Re-export основных типов
pub use collision::{reflect, Capsule, CollisionHit, CollisionWorld, EmptyWorld, HitboxOwner};
pub use kinematic::{detect_ground, integrate_velocity, spawn_kinematic_character, KinematicBody};
pub use layers::{CollisionLayer, LayerMask};
pub use rapier_world::{CollisionQuery, RapierCollisionWorld};
pub use static_world::{StaticCollider, StaticShape, StaticWorld};
