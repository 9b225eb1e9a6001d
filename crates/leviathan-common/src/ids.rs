//! ID types for monsters, loot, and render handles.
//!
//! IDs are allocated by their owning manager rather than a global counter so
//! that two simulations in the same process never share numbering state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a sea monster, stable for the monster's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonsterId(u64);

impl MonsterId {
    /// Creates a monster ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid monster ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) monster ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "monster#{}", self.0)
    }
}

/// Unique identifier for a loot drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LootId(u64);

impl LootId {
    /// Creates a loot ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loot#{}", self.0)
    }
}

/// Opaque handle handed out by the rendering collaborator.
///
/// The simulation stores it and passes it back; it never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle(u64);

impl RenderHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Handle used when no scene is attached.
    pub const DETACHED: Self = Self(0);
}

/// Monotonic allocator for raw ID values, starting at 1.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next raw value.
    pub fn next_raw(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }

    /// Allocates a monster ID.
    pub fn next_monster(&mut self) -> MonsterId {
        MonsterId::from_raw(self.next_raw())
    }

    /// Allocates a loot ID.
    pub fn next_loot(&mut self) -> LootId {
        LootId::from_raw(self.next_raw())
    }
}
