//! Sea monster data model and the roster that owns every live monster.

use glam::Vec3;
use leviathan_common::{IdAllocator, MonsterId, RenderHandle};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::MonsterKind;

/// Error types for monster operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MonsterError {
    /// Monster not found
    #[error("Monster not found: {0}")]
    NotFound(MonsterId),
    /// Monster is already dying and ignores further interaction
    #[error("Monster already dying: {0}")]
    AlreadyDying(MonsterId),
    /// Spawning would exceed the population cap
    #[error("Population full: cap {cap}")]
    PopulationFull {
        /// Population cap
        cap: usize,
    },
}

/// Result type for monster operations.
pub type MonsterResult<T> = Result<T, MonsterError>;

/// Behavior state of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterState {
    /// Deep underwater, drifting
    Lurking,
    /// Tracking the player underwater
    Hunting,
    /// Rising to the surface
    Surfacing,
    /// On the surface, making charge passes at the player
    Attacking,
    /// Returning to depth
    Diving,
    /// Killed, sinking and fading out
    Dying,
}

impl MonsterState {
    /// All states.
    pub const ALL: [Self; 6] = [
        Self::Lurking,
        Self::Hunting,
        Self::Surfacing,
        Self::Attacking,
        Self::Diving,
        Self::Dying,
    ];

    /// Whether the monster is visible at or near the surface.
    #[must_use]
    pub const fn is_surfaced(self) -> bool {
        matches!(self, Self::Surfacing | Self::Attacking)
    }

    /// Whether the monster still counts toward the population.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        !matches!(self, Self::Dying)
    }
}

/// Nested behavior while [`MonsterState::Attacking`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Driving straight through the player
    Charging,
    /// Swimming out to a withdrawal point before the next charge
    Repositioning {
        /// Remaining repositioning time
        timer: f32,
        /// Withdrawal point
        target: Vec3,
    },
}

impl AttackPhase {
    /// Whether this is the charging phase.
    #[must_use]
    pub const fn is_charging(&self) -> bool {
        matches!(self, Self::Charging)
    }
}

/// One hostile sea monster.
#[derive(Debug, Clone)]
pub struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) kind: MonsterKind,
    /// World position
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Pitch/yaw/roll used by the death animation
    pub(crate) rotation: Vec3,
    /// Material opacity, faded out while dying
    pub(crate) opacity: f32,
    pub(crate) state: MonsterState,
    pub(crate) state_timer: f32,
    pub(crate) health: i32,
    pub(crate) attack: Option<AttackPhase>,
    pub(crate) charge: f32,
    pub(crate) recoil: f32,
    pub(crate) glow: bool,
    pub(crate) anim_time: f32,
    pub(crate) handle: RenderHandle,
}

impl Monster {
    /// Creates a freshly spawned monster.
    ///
    /// New monsters start on the surface in [`MonsterState::Attacking`] so
    /// they are immediately visible and engageable.
    #[must_use]
    pub fn new(id: MonsterId, kind: MonsterKind, position: Vec3, velocity: Vec3, timer: f32) -> Self {
        Self {
            id,
            kind,
            position,
            velocity,
            rotation: Vec3::ZERO,
            opacity: 1.0,
            state: MonsterState::Attacking,
            state_timer: timer,
            health: kind.max_health(),
            attack: Some(AttackPhase::Charging),
            charge: 0.0,
            recoil: 0.0,
            glow: false,
            anim_time: 0.0,
            handle: RenderHandle::DETACHED,
        }
    }

    /// Monster ID.
    #[must_use]
    pub const fn id(&self) -> MonsterId {
        self.id
    }

    /// Monster kind.
    #[must_use]
    pub const fn kind(&self) -> MonsterKind {
        self.kind
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MonsterState {
        self.state
    }

    /// Remaining time in the current state; negative once expired.
    #[must_use]
    pub const fn state_timer(&self) -> f32 {
        self.state_timer
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Attack sub-state, present only while attacking.
    #[must_use]
    pub const fn attack_phase(&self) -> Option<AttackPhase> {
        self.attack
    }

    /// Jellyfish discharge charge level in `[0, 1)`.
    #[must_use]
    pub const fn charge(&self) -> f32 {
        self.charge
    }

    /// Whether the eyes glow (hunting).
    #[must_use]
    pub const fn is_glowing(&self) -> bool {
        self.glow
    }

    /// Whether the monster is dying.
    #[must_use]
    pub const fn is_dying(&self) -> bool {
        matches!(self.state, MonsterState::Dying)
    }

    /// Render handle assigned by the scene.
    #[must_use]
    pub const fn handle(&self) -> RenderHandle {
        self.handle
    }

    /// Switches state, resetting the timer, attack sub-state, and flinch.
    pub(crate) fn enter(&mut self, state: MonsterState, timer: f32) {
        self.state = state;
        self.state_timer = timer;
        self.attack = match state {
            MonsterState::Attacking => Some(AttackPhase::Charging),
            _ => None,
        };
        self.recoil = 0.0;
    }

    /// Public projection for radar and network display.
    #[must_use]
    pub fn view(&self) -> MonsterView {
        MonsterView {
            id: self.id,
            kind: self.kind,
            position: self.position,
            state: self.state,
        }
    }

    /// Render-facing transform.
    #[must_use]
    pub fn transform(&self) -> MonsterTransform {
        MonsterTransform {
            position: self.position,
            heading: self.velocity,
            rotation: self.rotation,
            opacity: self.opacity,
            glow: self.glow,
            anim_time: self.anim_time,
        }
    }
}

/// Summary of a monster exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterView {
    /// Monster ID
    pub id: MonsterId,
    /// Monster kind
    pub kind: MonsterKind,
    /// World position
    pub position: Vec3,
    /// Behavior state
    pub state: MonsterState,
}

/// Per-tick visual state pushed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterTransform {
    /// World position
    pub position: Vec3,
    /// Direction of travel (unnormalized velocity)
    pub heading: Vec3,
    /// Extra rotation applied while dying
    pub rotation: Vec3,
    /// Material opacity
    pub opacity: f32,
    /// Eye glow
    pub glow: bool,
    /// Accumulated animation phase
    pub anim_time: f32,
}

/// Owned collection of monsters, ordered by spawn.
///
/// IDs are allocated in increasing order and removal preserves order, so the
/// backing vector stays sorted by ID and lookups are binary searches.
#[derive(Debug, Default)]
pub struct MonsterRoster {
    monsters: Vec<Monster>,
    ids: IdAllocator,
}

impl MonsterRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total monsters including dying ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Monsters that count toward the population cap.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.monsters.iter().filter(|m| m.state.is_alive()).count()
    }

    /// Allocates an ID and inserts a monster built from it.
    pub fn insert_with(&mut self, build: impl FnOnce(MonsterId) -> Monster) -> MonsterId {
        let id = self.ids.next_monster();
        self.monsters.push(build(id));
        id
    }

    fn index_of(&self, id: MonsterId) -> Option<usize> {
        self.monsters.binary_search_by_key(&id, |m| m.id).ok()
    }

    /// Gets a monster.
    #[must_use]
    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.index_of(id).map(|i| &self.monsters[i])
    }

    /// Gets a mutable monster.
    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.index_of(id).map(move |i| &mut self.monsters[i])
    }

    /// Removes a monster. Removing an absent ID is a no-op.
    pub fn remove(&mut self, id: MonsterId) -> Option<Monster> {
        self.index_of(id).map(|i| self.monsters.remove(i))
    }

    /// Iterates monsters in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter()
    }

    /// Iterates monsters mutably in spawn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Monster> {
        self.monsters.iter_mut()
    }
}
