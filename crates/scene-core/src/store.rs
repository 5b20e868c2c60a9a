//! Observable control state for the tree scene.
//!
//! The store is the only state shared between the gesture tracker, the
//! manual-override controls, the formation engine and the camera rig. All
//! writers run on the same cooperative thread, so notification is a plain
//! synchronous callback walk; there is no locking. Callbacks must not write
//! back into the store (re-entrancy is not supported).

use fnv::FnvHashMap;
use glam::Vec2;

/// Describes a single store write; delivered to every subscriber.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StoreEvent {
    FormationProgress(f32),
    HandPosition(Vec2),
    HandDetected(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

pub struct Store {
    formation_progress: f32,
    hand_position: Vec2,
    is_hand_detected: bool,
    subscribers: FnvHashMap<SubscriptionId, Subscriber>,
    next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Starts formed: progress 1.0, hand centred, nothing detected.
    pub fn new() -> Self {
        Self {
            formation_progress: 1.0,
            hand_position: Vec2::ZERO,
            is_hand_detected: false,
            subscribers: FnvHashMap::default(),
            next_id: 0,
        }
    }

    pub fn formation_progress(&self) -> f32 {
        self.formation_progress
    }

    pub fn hand_position(&self) -> Vec2 {
        self.hand_position
    }

    pub fn is_hand_detected(&self) -> bool {
        self.is_hand_detected
    }

    /// Total setter; out-of-range input is clamped at ingestion.
    pub fn set_formation_progress(&mut self, progress: f32) {
        self.formation_progress = progress.clamp(0.0, 1.0);
        self.notify(StoreEvent::FormationProgress(self.formation_progress));
    }

    pub fn set_hand_position(&mut self, x: f32, y: f32) {
        self.hand_position = Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
        self.notify(StoreEvent::HandPosition(self.hand_position));
    }

    pub fn set_hand_detected(&mut self, detected: bool) {
        self.is_hand_detected = detected;
        self.notify(StoreEvent::HandDetected(detected));
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, Box::new(callback));
        id
    }

    /// Removes a subscriber; unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.remove(&id);
    }

    fn notify(&mut self, event: StoreEvent) {
        for callback in self.subscribers.values_mut() {
            callback(&event);
        }
    }
}
