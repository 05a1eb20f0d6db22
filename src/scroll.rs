use std::time::{Duration, Instant};

const SCROLL_ANIMATION: Duration = Duration::from_millis(240);
const SNAP_IDLE: Duration = Duration::from_millis(180);

/// Vertical extent of one card relative to the top of the feed viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardRect {
    pub id: u64,
    pub top: i32,
    pub height: u16,
}

impl CardRect {
    /// Fraction of the card inside a viewport of `viewport_height` rows.
    pub fn visible_ratio(&self, viewport_height: u16) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        let top = self.top.max(0);
        let bottom = (self.top + i32::from(self.height)).min(i32::from(viewport_height));
        let overlap = (bottom - top).max(0);
        overlap as f32 / f32::from(self.height)
    }
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    from: u32,
    to: u32,
    start: Instant,
    duration: Duration,
}

impl Tween {
    fn sample(&self, now: Instant) -> u32 {
        let elapsed = now.saturating_duration_since(self.start);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32().max(f32::EPSILON))
            .clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        let from = self.from as f32;
        let to = self.to as f32;
        (from + (to - from) * eased).round().max(0.0) as u32
    }

    fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.duration
    }
}

/// Scroll position over a stack of equally tall, viewport-sized cards.
#[derive(Clone, Debug)]
pub struct ScrollState {
    offset: u32,
    card_height: u16,
    cards: usize,
    tween: Option<Tween>,
    last_manual: Option<Instant>,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ScrollState {
    pub fn new(card_height: u16) -> Self {
        Self {
            offset: 0,
            card_height: card_height.max(1),
            cards: 0,
            tween: None,
            last_manual: None,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    fn max_offset(&self) -> u32 {
        (self.cards.saturating_sub(1) as u32) * u32::from(self.card_height)
    }

    fn card_top(&self, index: usize) -> u32 {
        (index as u32) * u32::from(self.card_height)
    }

    pub fn set_card_count(&mut self, cards: usize) {
        self.cards = cards;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Keeps the card nearest the top aligned when the viewport is resized.
    pub fn set_card_height(&mut self, height: u16) {
        let height = height.max(1);
        if height == self.card_height {
            return;
        }
        let anchor = self.nearest_index();
        self.card_height = height;
        self.tween = None;
        self.offset = self.card_top(anchor).min(self.max_offset());
    }

    pub fn nearest_index(&self) -> usize {
        let height = u32::from(self.card_height);
        ((self.offset + height / 2) / height) as usize
    }

    pub fn rects<I>(&self, ids: I) -> Vec<CardRect>
    where
        I: IntoIterator<Item = u64>,
    {
        ids.into_iter()
            .enumerate()
            .map(|(index, id)| CardRect {
                id,
                top: self.card_top(index) as i32 - self.offset as i32,
                height: self.card_height,
            })
            .collect()
    }

    /// Free scrolling, e.g. from the mouse wheel. Interrupts any animation.
    pub fn scroll_by(&mut self, delta: i32, now: Instant) {
        self.tween = None;
        let next = i64::from(self.offset) + i64::from(delta);
        self.offset = next.clamp(0, i64::from(self.max_offset())) as u32;
        self.last_manual = Some(now);
    }

    /// Starts a smooth scroll that aligns card `index` with the top edge.
    pub fn scroll_to(&mut self, index: usize, now: Instant) {
        let to = self.card_top(index).min(self.max_offset());
        let from = self.tween.map_or(self.offset, |tween| tween.sample(now));
        self.last_manual = None;
        if from == to {
            self.tween = None;
            self.offset = to;
            return;
        }
        self.tween = Some(Tween {
            from,
            to,
            start: now,
            duration: SCROLL_ANIMATION,
        });
    }

    /// Advances the animation and snaps onto the nearest card once manual
    /// scrolling has been idle for a moment. Returns true when the offset
    /// changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.offset;
        if let Some(tween) = self.tween {
            self.offset = tween.sample(now).min(self.max_offset());
            if tween.is_done(now) {
                self.offset = tween.to.min(self.max_offset());
                self.tween = None;
            }
        } else if let Some(last) = self.last_manual {
            if now.saturating_duration_since(last) >= SNAP_IDLE {
                self.last_manual = None;
                if self.offset % u32::from(self.card_height) != 0 {
                    self.scroll_to(self.nearest_index(), now);
                }
            }
        }
        self.offset != before
    }
}
