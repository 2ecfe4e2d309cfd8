//! Weapon state (магазин, cooldown, буфер ввода)

use bevy::prelude::*;
use serde::Deserialize;

use crate::components::ProjectileStats;

/// Запомненное нажатие (fire/reload)
///
/// - `At(tick)` - нажали, когда оружие было занято; живёт `input_buffer` секунд
/// - `Sticky` - авто-очередь (перезарядка после последнего патрона), не истекает
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum BufferedPress {
    #[default]
    None,
    At(u64),
    Sticky,
}

impl BufferedPress {
    pub fn is_active(&self, now: u64, window_ticks: u64) -> bool {
        match *self {
            BufferedPress::None => false,
            BufferedPress::At(tick) => now.saturating_sub(tick) < window_ticks,
            BufferedPress::Sticky => true,
        }
    }
}

/// Базовые параметры оружия (из конфига/префаба)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[serde(default)]
pub struct WeaponSpec {
    pub magazine_size: u32,
    /// Секунды между выстрелами
    pub fire_interval: f32,
    /// Секунды перезарядки
    pub reload_duration: f32,
    /// Окно буфера нажатий (секунды)
    pub input_buffer: f32,
    /// Базовое число дробин за выстрел
    pub pellets: u32,
    pub spread_degrees: f32,
    /// Дуло: столько метров от глаз вдоль прицела
    pub muzzle_distance: f32,
    pub projectile: ProjectileStats,
}

impl Default for WeaponSpec {
    fn default() -> Self {
        Self {
            magazine_size: 6,
            fire_interval: 0.5,
            reload_duration: 2.6,
            input_buffer: 0.2,
            pellets: 1,
            spread_degrees: 0.0,
            muzzle_distance: 0.5,
            projectile: ProjectileStats::default(),
        }
    }
}

/// Оружие игрока (живёт на entity стрелка)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub spec: WeaponSpec,
    pub current_ammo: u32,
    /// Тик, до которого идёт cooldown выстрела (exclusive)
    pub cooldown_until: u64,
    pub reloading: bool,
    pub queued_fire: BufferedPress,
    pub queued_reload: BufferedPress,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponSpec::default())
    }
}

impl Weapon {
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            spec,
            current_ammo: spec.magazine_size,
            cooldown_until: 0,
            reloading: false,
            queued_fire: BufferedPress::None,
            queued_reload: BufferedPress::None,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.current_ammo > 0
    }

    pub fn can_reload(&self) -> bool {
        !self.reloading && self.current_ammo < self.spec.magazine_size
    }

    /// Занято: cooldown после выстрела или перезарядка
    pub fn is_busy(&self, now: u64) -> bool {
        self.reloading || now < self.cooldown_until
    }

    pub fn refill(&mut self) {
        self.current_ammo = self.spec.magazine_size;
        self.reloading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_press_window() {
        assert!(!BufferedPress::None.is_active(10, 12));
        assert!(BufferedPress::At(10).is_active(21, 12));
        assert!(!BufferedPress::At(10).is_active(22, 12));
        assert!(BufferedPress::Sticky.is_active(u64::MAX, 0));
    }

    #[test]
    fn test_new_weapon_is_loaded() {
        let weapon = Weapon::default();
        assert_eq!(weapon.current_ammo, 6);
        assert!(weapon.can_fire());
        assert!(!weapon.can_reload());
        assert!(!weapon.is_busy(0));
    }

    #[test]
    fn test_busy_while_cooling_down_or_reloading() {
        let mut weapon = Weapon {
            cooldown_until: 30,
            ..default()
        };
        assert!(weapon.is_busy(29));
        assert!(!weapon.is_busy(30));

        weapon.reloading = true;
        assert!(weapon.is_busy(100));
        assert!(!weapon.can_reload());
    }
}
