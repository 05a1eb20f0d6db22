use std::collections::{HashSet, VecDeque};

use crate::scroll::CardRect;

pub const DEFAULT_THRESHOLD: f32 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityEvent {
    pub id: u64,
    pub visible: bool,
}

/// Source of "card X became visible / stopped being visible" signals.
pub trait VisibilityObserver {
    fn observe(&mut self, id: u64);
    fn unobserve(&mut self, id: u64);
    fn drain(&mut self) -> Vec<VisibilityEvent>;

    /// Called after every scroll or resize with the current card geometry.
    fn layout_changed(&mut self, _cards: &[CardRect], _viewport_height: u16) {}
}

/// Derives visibility from card geometry: a card is visible while at least
/// `threshold` of its height is inside the viewport.
#[derive(Debug)]
pub struct ViewportObserver {
    threshold: f32,
    observed: HashSet<u64>,
    visible: HashSet<u64>,
    pending: Vec<VisibilityEvent>,
}

impl ViewportObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            observed: HashSet::new(),
            visible: HashSet::new(),
            pending: Vec::new(),
        }
    }

    fn recompute(&mut self, cards: &[CardRect], viewport_height: u16) {
        for card in cards {
            if !self.observed.contains(&card.id) {
                continue;
            }
            let now_visible = card.visible_ratio(viewport_height) >= self.threshold;
            let was_visible = self.visible.contains(&card.id);
            if now_visible == was_visible {
                continue;
            }
            if now_visible {
                self.visible.insert(card.id);
            } else {
                self.visible.remove(&card.id);
            }
            self.pending.push(VisibilityEvent {
                id: card.id,
                visible: now_visible,
            });
        }
    }
}

impl VisibilityObserver for ViewportObserver {
    fn observe(&mut self, id: u64) {
        self.observed.insert(id);
    }

    fn unobserve(&mut self, id: u64) {
        self.observed.remove(&id);
        self.visible.remove(&id);
    }

    fn drain(&mut self) -> Vec<VisibilityEvent> {
        std::mem::take(&mut self.pending)
    }

    fn layout_changed(&mut self, cards: &[CardRect], viewport_height: u16) {
        self.recompute(cards, viewport_height);
    }
}

/// Replays queued events for observed ids; used to drive the feed without
/// a terminal.
#[derive(Debug, Default)]
pub struct ScriptedObserver {
    observed: HashSet<u64>,
    queue: VecDeque<VisibilityEvent>,
}

impl ScriptedObserver {
    pub fn push(&mut self, id: u64, visible: bool) {
        self.queue.push_back(VisibilityEvent { id, visible });
    }
}

impl VisibilityObserver for ScriptedObserver {
    fn observe(&mut self, id: u64) {
        self.observed.insert(id);
    }

    fn unobserve(&mut self, id: u64) {
        self.observed.remove(&id);
    }

    fn drain(&mut self) -> Vec<VisibilityEvent> {
        let observed = &self.observed;
        self.queue
            .drain(..)
            .filter(|event| observed.contains(&event.id))
            .collect()
    }
}
