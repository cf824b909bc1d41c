//! In-memory movement ledger
//!
//! Keeps the movement rows keyed by id and hands out fresh ids. Pure
//! bookkeeping: lifecycle decisions and persistence belong to the engine,
//! which keeps this map in lock-step with the store's movements table.

use std::collections::HashMap;

use crate::types::{Movement, MovementId};

/// Movement rows indexed by id
#[derive(Debug, Default)]
pub struct MovementLedger {
    movements: HashMap<MovementId, Movement>,
    next_id: MovementId,
}

impl MovementLedger {
    /// Build the ledger from loaded movement rows
    ///
    /// The id counter resumes after the highest id seen, so ids stay unique
    /// across restarts.
    pub fn load(movements: Vec<Movement>) -> Self {
        let next_id = movements.iter().map(|m| m.id + 1).max().unwrap_or(1);
        let movements = movements.into_iter().map(|m| (m.id, m)).collect();
        MovementLedger { movements, next_id }
    }

    /// Peek at the id the next inserted movement should use
    pub fn next_id(&self) -> MovementId {
        self.next_id
    }

    /// Insert a movement, advancing the id counter past it
    pub fn insert(&mut self, movement: Movement) {
        self.next_id = self.next_id.max(movement.id + 1);
        self.movements.insert(movement.id, movement);
    }

    /// Look up a movement by id
    pub fn get(&self, id: MovementId) -> Option<&Movement> {
        self.movements.get(&id)
    }

    /// Mutable lookup by id
    pub fn get_mut(&mut self, id: MovementId) -> Option<&mut Movement> {
        self.movements.get_mut(&id)
    }

    /// Remove a movement by id
    pub fn remove(&mut self, id: MovementId) -> Option<Movement> {
        self.movements.remove(&id)
    }

    /// Snapshot of every movement, sorted by id
    pub fn all(&self) -> Vec<Movement> {
        let mut movements: Vec<Movement> = self.movements.values().cloned().collect();
        movements.sort_by_key(|m| m.id);
        movements
    }

    /// Number of movements held
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// True when no movements are held
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}
