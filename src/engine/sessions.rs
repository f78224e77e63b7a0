use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::{not_found_error, Error};

/// In-memory sessions that expire after a period of inactivity.
pub struct Sessions<T> {
    ttl: Duration,
    entries: HashMap<Uuid, Entry<T>>,
}

struct Entry<T> {
    last_active: Instant,
    value: T,
}

impl<T> Sessions<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Stores a new session, dropping any that have gone idle.
    pub fn insert(&mut self, value: T) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_at(id, value, Instant::now());
        id
    }

    fn insert_at(&mut self, id: Uuid, value: T, now: Instant) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_active) < ttl);

        let expired = before - self.entries.len();
        if expired > 0 {
            tracing::debug!("expired {} idle sessions", expired);
        }

        self.entries.insert(
            id,
            Entry {
                last_active: now,
                value,
            },
        );
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Result<&mut T, Error> {
        self.get_mut_at(id, Instant::now())
    }

    fn get_mut_at(&mut self, id: &Uuid, now: Instant) -> Result<&mut T, Error> {
        let ttl = self.ttl;
        let entry = self
            .entries
            .get_mut(id)
            .filter(|entry| now.saturating_duration_since(entry.last_active) < ttl)
            .ok_or_else(not_found_error)?;

        entry.last_active = now;
        Ok(&mut entry.value)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
