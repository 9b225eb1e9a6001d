//! # Leviathan Gameplay
//!
//! Sea monster systems for Project Leviathan.
//!
//! This crate provides the behavioral core of hostile sea monsters:
//! - Monster data model, kind table, and per-kind overlays
//! - Per-monster state machine (lurk, hunt, surface, attack, dive, die)
//! - Population manager with the night respawn trigger
//! - Combat resolver for volleys, cannonballs, and contact hits
//! - Loot lifecycle and the player stats accumulator
//! - Event bus for render, audio, and network collaborators
//! - The [`Simulation`] context that ticks everything in order

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod ai;
pub mod cannon;
pub mod combat;
pub mod config;
pub mod dice;
pub mod events;
pub mod kind;
pub mod loot;
pub mod monster;
pub mod overlay;
pub mod population;
pub mod scene;
pub mod simulation;
pub mod stats;
pub mod time;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::ai::{StepContext, StepOutcome};
    pub use crate::cannon::*;
    pub use crate::combat::*;
    pub use crate::config::*;
    pub use crate::dice::*;
    pub use crate::events::*;
    pub use crate::kind::*;
    pub use crate::loot::*;
    pub use crate::monster::*;
    pub use crate::population::*;
    pub use crate::scene::*;
    pub use crate::simulation::*;
    pub use crate::stats::*;
    pub use crate::time::*;
}

pub use prelude::*;
