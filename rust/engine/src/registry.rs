//! Seat-to-session registry owned by the transport boundary.
//!
//! Sessions may touch the registry from any thread. Every operation takes the
//! lock once, so readers never see a half-applied change. The engine itself
//! never holds a registry.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::errors::GameError;

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry<T> {
    pub name: String,
    pub value: T,
    pub joined_at: DateTime<Utc>,
    pub faulted: bool,
}

#[derive(Debug)]
pub struct SeatRegistry<T> {
    entries: RwLock<HashMap<String, RegistryEntry<T>>>,
}

impl<T> Default for SeatRegistry<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> SeatRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, RegistryEntry<T>>> {
        match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, RegistryEntry<T>>> {
        match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn register(&self, name: &str, value: T) -> Result<(), GameError> {
        if name.trim().is_empty() {
            return Err(GameError::EmptyPlayerName);
        }
        let mut guard = self.write();
        if guard.contains_key(name) {
            return Err(GameError::DuplicatePlayerName(name.to_string()));
        }
        guard.insert(
            name.to_string(),
            RegistryEntry {
                name: name.to_string(),
                value,
                joined_at: Utc::now(),
                faulted: false,
            },
        );
        tracing::debug!(player = %name, "seat registered");
        Ok(())
    }

    /// Consistent copy of every entry, oldest first.
    pub fn snapshot(&self) -> Vec<RegistryEntry<T>> {
        let mut entries: Vec<RegistryEntry<T>> = self.read().values().cloned().collect();
        entries.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then_with(|| a.name.cmp(&b.name)));
        entries
    }

    pub fn get(&self, name: &str) -> Option<T> {
        self.read().get(name).map(|e| e.value.clone())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns false when `name` is not registered.
    pub fn mark_faulted(&self, name: &str) -> bool {
        match self.write().get_mut(name) {
            Some(entry) => {
                if !entry.faulted {
                    tracing::warn!(player = %name, "seat marked faulted");
                }
                entry.faulted = true;
                true
            }
            None => false,
        }
    }

    pub fn is_faulted(&self, name: &str) -> bool {
        self.read().get(name).is_some_and(|e| e.faulted)
    }

    /// Removes `name` only if it is faulted, in one step.
    pub fn remove_if_faulted(&self, name: &str) -> Option<T> {
        let mut guard = self.write();
        if guard.get(name).is_some_and(|e| e.faulted) {
            guard.remove(name).map(|e| e.value)
        } else {
            None
        }
    }

    /// Removes every faulted entry and returns their names.
    pub fn purge_faulted(&self) -> Vec<String> {
        let mut removed = Vec::new();
        self.write().retain(|name, e| {
            if e.faulted {
                removed.push(name.clone());
                false
            } else {
                true
            }
        });
        removed.sort();
        removed
    }
}
