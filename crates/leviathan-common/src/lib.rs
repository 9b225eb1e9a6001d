//! # Leviathan Common
//!
//! Common types, utilities, and shared abstractions for Project Leviathan.
//!
//! This crate provides foundational types used across all Leviathan subsystems:
//! - ID types (MonsterId, LootId, RenderHandle)
//! - Sea-plane vector helpers over `glam::Vec3`
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use glam::Vec3;
pub use prelude::*;
