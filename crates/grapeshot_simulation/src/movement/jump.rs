//! Q3 jump queue
//!
//! Прыжок можно нажать чуть раньше приземления: флаг висит до
//! ближайшего grounded тика (или до отпускания кнопки).

use crate::components::JumpQueue;
use crate::input::ButtonState;

impl JumpQueue {
    /// Обновить очередь по состоянию кнопки за тик
    pub fn update(&mut self, jump: ButtonState, hold_to_bhop: bool) {
        if hold_to_bhop {
            self.wish_jump = jump.pressed;
            return;
        }

        if jump.just_pressed && !self.wish_jump {
            self.wish_jump = true;
        }
        if jump.just_released {
            self.wish_jump = false;
        }
    }
}
