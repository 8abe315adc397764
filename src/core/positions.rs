// src/core/positions.rs
use crate::types::Direction;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

/// Лимит одновременных сделок на одно направление.
pub const MAX_TRADES_PER_DIRECTION: u32 = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    long: u32,
    short: u32,
}

impl Counts {
    fn slot(&mut self, direction: Direction) -> &mut u32 {
        match direction {
            Direction::Long => &mut self.long,
            Direction::Short => &mut self.short,
        }
    }
}

/// Process-wide open-trade counters, shared between the engine (increment)
/// and order monitors (reset). Cloning shares the same counters.
#[derive(Debug, Clone, Default)]
pub struct PositionCounters {
    inner: Arc<Mutex<Counts>>,
}

impl PositionCounters {
    pub fn new() -> Self {
        Self::default()
    }

    // poison игнорируется: Counts меняется одной операцией
    fn lock(&self) -> MutexGuard<'_, Counts> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn count(&self, direction: Direction) -> u32 {
        *self.lock().slot(direction)
    }

    pub fn has_capacity(&self, direction: Direction) -> bool {
        self.count(direction) < MAX_TRADES_PER_DIRECTION
    }

    /// Увеличивает счётчик, не превышая лимит. Возвращает новое значение.
    pub fn increment(&self, direction: Direction) -> u32 {
        let mut counts = self.lock();
        let slot = counts.slot(direction);
        *slot = (*slot + 1).min(MAX_TRADES_PER_DIRECTION);
        *slot
    }

    /// Сбрасывает сторону в ноль.
    pub fn reset(&self, direction: Direction) {
        *self.lock().slot(direction) = 0;
        info!("🔄 Position counter reset for {}", direction);
    }
}
