//! Event bus
//!
//! Два вида уведомлений:
//! - Обычные (fire-and-forget) - Bevy events (`ProjectileFired`, `DamageDealt`, ...)
//! - Фильтруемые - `FilterChain<C>`: контекст проходит через слушателей по
//!   порядку регистрации, каждый может переписать поля, ядро читает итог

pub mod filter;

pub use filter::*;
