//! Filter chain - упорядоченный список чистых трансформаций контекста
//!
//! Вместо глобального dispatch: chain - ресурс симуляции, слушатели
//! регистрируются при сборке plugin'ов.
//!
//! Flow:
//! 1. Ядро строит контекст с базовыми значениями
//! 2. `apply` прогоняет его через все фильтры по порядку регистрации
//! 3. Ядро читает итоговые поля (и само клампит их, если нужно)

use bevy::prelude::*;

pub type FilterFn<C> = Box<dyn Fn(C) -> C + Send + Sync>;

#[derive(Resource)]
pub struct FilterChain<C: Send + Sync + 'static> {
    filters: Vec<FilterFn<C>>,
}

impl<C: Send + Sync + 'static> Default for FilterChain<C> {
    fn default() -> Self {
        Self { filters: Vec::new() }
    }
}

impl<C: Send + Sync + 'static> FilterChain<C> {
    /// Добавить слушателя в конец цепочки
    pub fn register(&mut self, filter: impl Fn(C) -> C + Send + Sync + 'static) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Прогнать контекст через все фильтры
    pub fn apply(&self, context: C) -> C {
        self.filters.iter().fold(context, |ctx, filter| filter(ctx))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Регистрация filter chain'ов на App
pub trait FilterAppExt {
    fn init_filter<C: Send + Sync + 'static>(&mut self) -> &mut Self;

    fn add_filter<C: Send + Sync + 'static>(
        &mut self,
        filter: impl Fn(C) -> C + Send + Sync + 'static,
    ) -> &mut Self;
}

impl FilterAppExt for App {
    fn init_filter<C: Send + Sync + 'static>(&mut self) -> &mut Self {
        self.init_resource::<FilterChain<C>>()
    }

    fn add_filter<C: Send + Sync + 'static>(
        &mut self,
        filter: impl Fn(C) -> C + Send + Sync + 'static,
    ) -> &mut Self {
        self.init_filter::<C>();
        self.world_mut()
            .resource_mut::<FilterChain<C>>()
            .register(filter);
        self
    }
}
