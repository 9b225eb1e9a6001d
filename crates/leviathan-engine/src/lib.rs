//! Leviathan Engine - headless runner for sea monster sessions.
//!
//! Loads configuration, drives the gameplay [`Simulation`] on a fixed
//! timestep, and reports what happened.
//!
//! [`Simulation`]: leviathan_gameplay::Simulation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod session;
pub mod timing;

pub use config::EngineConfig;
pub use session::{Session, SessionSummary};
pub use timing::FixedStep;
