//! Interface to the rendering collaborator.
//!
//! The scene creates whatever visuals it likes for a monster and hands back an
//! opaque [`RenderHandle`]; the simulation only stores and returns it.

use ahash::AHashMap;
use glam::Vec3;
use leviathan_common::{MonsterId, RenderHandle};

use crate::kind::MonsterKind;
use crate::monster::MonsterTransform;

/// Rendering collaborator for monster visuals.
pub trait MonsterScene {
    /// Creates visuals for a new monster.
    fn spawn(&mut self, id: MonsterId, kind: MonsterKind, position: Vec3) -> RenderHandle;
    /// Updates a monster's visuals for this frame.
    fn sync(&mut self, handle: RenderHandle, transform: &MonsterTransform);
    /// Removes a monster's visuals.
    fn despawn(&mut self, handle: RenderHandle);
}

/// Scene that renders nothing (headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScene;

impl MonsterScene for NullScene {
    fn spawn(&mut self, _id: MonsterId, _kind: MonsterKind, _position: Vec3) -> RenderHandle {
        RenderHandle::DETACHED
    }

    fn sync(&mut self, _handle: RenderHandle, _transform: &MonsterTransform) {}

    fn despawn(&mut self, _handle: RenderHandle) {}
}

/// Scene that records calls, for tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingScene {
    next: u64,
    live: AHashMap<RenderHandle, MonsterTransform>,
    /// Handles created, in order
    pub spawned: Vec<RenderHandle>,
    /// Handles removed, in order
    pub despawned: Vec<RenderHandle>,
}

impl RecordingScene {
    /// Creates a recording scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visuals currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Last transform synced for a handle.
    #[must_use]
    pub fn transform(&self, handle: RenderHandle) -> Option<&MonsterTransform> {
        self.live.get(&handle)
    }
}

impl MonsterScene for RecordingScene {
    fn spawn(&mut self, _id: MonsterId, _kind: MonsterKind, position: Vec3) -> RenderHandle {
        self.next += 1;
        let handle = RenderHandle::from_raw(self.next);
        self.live.insert(
            handle,
            MonsterTransform {
                position,
                heading: Vec3::ZERO,
                rotation: Vec3::ZERO,
                opacity: 1.0,
                glow: false,
                anim_time: 0.0,
            },
        );
        self.spawned.push(handle);
        handle
    }

    fn sync(&mut self, handle: RenderHandle, transform: &MonsterTransform) {
        if let Some(slot) = self.live.get_mut(&handle) {
            *slot = *transform;
        }
    }

    fn despawn(&mut self, handle: RenderHandle) {
        if self.live.remove(&handle).is_some() {
            self.despawned.push(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_scene_lifecycle() {
        let mut scene = RecordingScene::new();
        let handle = scene.spawn(MonsterId::from_raw(1), MonsterKind::Kraken, Vec3::ONE);
        assert_eq!(scene.live_count(), 1);

        scene.despawn(handle);
        scene.despawn(handle);
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.despawned.len(), 1);
    }
}
