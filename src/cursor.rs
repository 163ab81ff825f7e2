//! Walks a player's scorecard looking for the next category they are allowed to pick.

use crate::scoring::Scorer;
use crate::types::{DiceSet, Player, ScoreCategory};

/// Bonus Yotsees a player may score on top of their first.
pub const MAX_YOTSEE_BONUSES: u8 = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    /// Towards Aces.
    Up,
    /// Towards Chance.
    Down,
}

impl Direction {
    pub fn step(&self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// Whether `player` may currently commit `category` with `dice` on the table. Open categories
/// always can. A committed Yotsee can while another bonus is both allowed and on the table.
pub fn is_selectable(player: &Player, dice: &DiceSet, category: ScoreCategory) -> bool {
    let scorecard = &player.scorecard;
    let Some(committed) = scorecard.get(category) else {
        return true;
    };
    category == ScoreCategory::Yotsee
        && player.yotsee_bonus_count < MAX_YOTSEE_BONUSES
        && Scorer::new(dice, scorecard).live(ScoreCategory::Yotsee) > committed
}

/// The first selectable category strictly past `from` in `direction`, wrapping around the card.
/// `None` for `from` starts the scan at the edge of the card. Returns `None` only when nothing at
/// all is selectable.
pub fn next(
    player: &Player,
    dice: &DiceSet,
    from: Option<ScoreCategory>,
    direction: Direction,
) -> Option<ScoreCategory> {
    let count = ScoreCategory::COUNT as isize;
    let start = match (from, direction) {
        (Some(category), _) => category.index() as isize,
        (None, Direction::Down) => -1,
        (None, Direction::Up) => count,
    };
    (1..=count)
        .map(|offset| start + offset * direction.step())
        .map(|position| ScoreCategory::from_index(position.rem_euclid(count) as usize))
        .find(|&category| is_selectable(player, dice, category))
}
