//! Tick-driven timer queue
//!
//! Отложенные one-shot действия (завершение перезарядки и т.п.).
//! Никаких потоков/корутин: очередь опрашивается системой раз в тик.

use bevy::prelude::*;

/// Счётчик fixed-тиков симуляции (монотонный)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct SimulationTick(pub u64);

/// Система: +1 тик (первая в FixedUpdate)
pub fn advance_simulation_tick(mut tick: ResMut<SimulationTick>) {
    tick.0 += 1;
}

/// Допуск на ошибку f32/Duration при пересчёте в тики
const TICK_EPSILON: f64 = 1e-4;

/// Секунды → целые тики (округление вверх, отрицательное = 0)
pub fn secs_to_ticks(secs: f32, tick_hz: f64) -> u64 {
    (secs.max(0.0) as f64 * tick_hz - TICK_EPSILON).ceil().max(0.0) as u64
}

#[derive(Debug, Clone)]
struct TimerEntry<T> {
    due_tick: u64,
    seq: u64,
    payload: T,
}

/// Очередь one-shot таймеров
///
/// Порядок срабатывания: по due_tick, при равенстве - FIFO.
#[derive(Resource, Debug)]
pub struct TimerQueue<T: Send + Sync + 'static> {
    entries: Vec<TimerEntry<T>>,
    next_seq: u64,
}

impl<T: Send + Sync + 'static> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T: Send + Sync + 'static> TimerQueue<T> {
    /// Запланировать через `delay_ticks` тиков от `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u64, payload: T) {
        self.entries.push(TimerEntry {
            due_tick: now + delay_ticks,
            seq: self.next_seq,
            payload,
        });
        self.next_seq += 1;
    }

    /// Запланировать через `delay` секунд (округление вверх до целого тика)
    pub fn schedule_secs(&mut self, now: u64, delay: f32, tick_hz: f64, payload: T) {
        self.schedule(now, secs_to_ticks(delay, tick_hz), payload);
    }

    /// Забрать все созревшие payload'ы
    pub fn poll(&mut self, now: u64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.due_tick <= now);
        self.entries = pending;

        due.sort_by_key(|entry| (entry.due_tick, entry.seq));
        due.into_iter().map(|entry| entry.payload).collect()
    }

    /// Отменить все записи, подходящие под предикат
    pub fn cancel(&mut self, predicate: impl Fn(&T) -> bool) {
        self.entries.retain(|entry| !predicate(&entry.payload));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
