use crate::scroll::CardRect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Index of the card whose top edge sits within `tolerance` rows of the
/// viewport top, if any.
pub fn snapped_index(cards: &[CardRect], tolerance: i32) -> Option<usize> {
    cards
        .iter()
        .position(|card| (-tolerance..=tolerance).contains(&card.top))
}

/// Card to scroll to for a navigation request. `None` means there is
/// nothing to do: no snapped card, or already at that end of the feed.
pub fn target_index(cards: &[CardRect], tolerance: i32, direction: Direction) -> Option<usize> {
    let current = snapped_index(cards, tolerance)?;
    match direction {
        Direction::Down => (current + 1 < cards.len()).then_some(current + 1),
        Direction::Up => current.checked_sub(1),
    }
}
