//! Scores for every row of the card under the wildcard rule.
//!
//! Wildcards (faces showing `0`) count towards any face when tallying, and every wildcard on the
//! table also bumps a multiplier that most categories get scaled by.

use crate::types::{DiceSet, ScoreCategory, ScoreRow, Scorecard, Total};

pub const UPPER_BONUS_THRESHOLD: u32 = 63;
pub const UPPER_BONUS: u32 = 35;
pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YOTSEE_SCORE: u32 = 50;
pub const YOTSEE_BONUS: u32 = 100;
pub const ALL_WILD_YOTSEE_SCORE: u32 = 500;
pub const ALL_WILD_YOTSEE_BONUS: u32 = 1000;

/// Per-face counts of the dice, indexed by face `0..=6`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Tallies {
    /// Dice showing `f` or a wildcard. `with_wild[0]` is just the wildcard count.
    with_wild: [u32; 7],
    /// Dice showing exactly `f`.
    without_wild: [u32; 7],
    dice_sum: u32,
}

/// Which base categories are scored from the dice rather than read off the scorecard.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Preview {
    /// Every category is live.
    Everything,
    /// Only this one category is live. Everything else shows its committed value.
    Only(ScoreCategory),
    /// Nothing is live. Rows show exactly what has been committed.
    Nothing,
}

pub struct Scorer<'a> {
    tallies: Tallies,
    scorecard: &'a Scorecard,
    preview: Preview,
}

impl Tallies {
    pub fn new(dice: &DiceSet) -> Self {
        let mut with_wild = [0u32; 7];
        let mut without_wild = [0u32; 7];
        for value in dice.values() {
            without_wild[value as usize] += 1;
        }
        for face in 0..7 {
            with_wild[face] = if face == 0 {
                without_wild[0]
            } else {
                without_wild[0] + without_wild[face]
            };
        }
        Self {
            with_wild,
            without_wild,
            dice_sum: dice.values().iter().map(|&v| v as u32).sum(),
        }
    }

    pub fn wild_count(&self) -> u32 {
        self.with_wild[0]
    }

    pub fn multiplier(&self) -> u32 {
        self.wild_count() + 1
    }

    pub fn with_wild(&self, face: u8) -> u32 {
        self.with_wild[face as usize]
    }

    pub fn without_wild(&self, face: u8) -> u32 {
        self.without_wild[face as usize]
    }

    /// Sum of the raw faces. Wildcards add nothing.
    pub fn dice_sum(&self) -> u32 {
        self.dice_sum
    }

    fn has(&self, face: u8) -> bool {
        self.without_wild(face) > 0
    }

    fn of_a_kind(&self, k: u32) -> u32 {
        if !self.with_wild.iter().any(|&count| count >= k) {
            return 0;
        }
        let wild = self.wild_count();
        if wild == 0 {
            return self.dice_sum * self.multiplier();
        }
        // Index 0 is a candidate too, but any face it could win on will already have matched.
        for face in (0..=6u32).rev() {
            if self.with_wild[face as usize] >= k {
                let per_wild = if wild < k { face } else { 10 };
                return (self.dice_sum + wild * per_wild) * self.multiplier();
            }
        }
        0
    }

    fn full_house(&self) -> u32 {
        let pairs = (1..=6).filter(|&f| self.with_wild(f) >= 2).count();
        let empty = (1..=6).filter(|&f| self.with_wild(f) == 0).count();
        if pairs == 2 && empty == 4 {
            FULL_HOUSE_SCORE * self.multiplier()
        } else {
            0
        }
    }

    fn small_straight(&self) -> u32 {
        let single = |a: u8| if self.has(a) { 1 } else { 0 };
        let pair = |a: u8, b: u8| if self.has(a) && self.has(b) { 2 } else { 0 };
        let coverage =
            single(3) + single(4) + pair(1, 2) + pair(2, 5) + pair(5, 6) + self.without_wild(0);
        if coverage >= 4 {
            SMALL_STRAIGHT_SCORE * self.multiplier()
        } else {
            0
        }
    }

    fn large_straight(&self) -> u32 {
        let middle = (2..=5).filter(|&f| self.has(f)).count() as u32;
        let end = if self.has(1) || self.has(6) { 1 } else { 0 };
        if middle + end + self.without_wild(0) == 5 {
            LARGE_STRAIGHT_SCORE * self.multiplier()
        } else {
            0
        }
    }

    fn yotsee(&self, scorecard: &Scorecard) -> u32 {
        let committed = scorecard.get(ScoreCategory::Yotsee).unwrap_or(0);
        let faces = (1..=6).filter(|&f| self.has(f)).count();
        match faces {
            1 if scorecard.has_yotsee() => committed + YOTSEE_BONUS * self.multiplier(),
            1 => YOTSEE_SCORE * self.multiplier(),
            0 if scorecard.has_yotsee() => committed + ALL_WILD_YOTSEE_BONUS,
            0 => ALL_WILD_YOTSEE_SCORE,
            _ => committed,
        }
    }

    fn chance(&self) -> u32 {
        (self.dice_sum + self.wild_count() * 6) * self.multiplier()
    }
}

impl<'a> Scorer<'a> {
    /// A scorer which evaluates every row live from `dice`.
    pub fn new(dice: &DiceSet, scorecard: &'a Scorecard) -> Self {
        Self {
            tallies: Tallies::new(dice),
            scorecard,
            preview: Preview::Everything,
        }
    }

    pub fn with_preview(self, preview: Preview) -> Self {
        Self { preview, ..self }
    }

    /// What `category` would score if the current dice were committed to it.
    pub fn live(&self, category: ScoreCategory) -> u32 {
        let t = &self.tallies;
        match category {
            ScoreCategory::Aces
            | ScoreCategory::Twos
            | ScoreCategory::Threes
            | ScoreCategory::Fours
            | ScoreCategory::Fives
            | ScoreCategory::Sixes => {
                let face = category.index() as u8 + 1;
                t.with_wild(face) * face as u32 * t.multiplier()
            }
            ScoreCategory::ThreeOfKind => t.of_a_kind(3),
            ScoreCategory::FourOfKind => t.of_a_kind(4),
            ScoreCategory::FullHouse => t.full_house(),
            ScoreCategory::SmallStraight => t.small_straight(),
            ScoreCategory::LargeStraight => t.large_straight(),
            ScoreCategory::Yotsee => t.yotsee(self.scorecard),
            ScoreCategory::Chance => t.chance(),
        }
    }

    fn is_live(&self, category: ScoreCategory) -> bool {
        match self.preview {
            Preview::Everything => true,
            Preview::Only(previewed) => previewed == category,
            Preview::Nothing => false,
        }
    }

    /// The value a row shows. `None` only for a base category that is neither committed nor
    /// previewed. Totals treat such categories as zero.
    pub fn value(&self, row: impl Into<ScoreRow>) -> Option<u32> {
        match row.into() {
            ScoreRow::Category(category) if self.is_live(category) => Some(self.live(category)),
            ScoreRow::Category(category) => self.scorecard.get(category),
            ScoreRow::Total(total) => Some(self.total(total)),
        }
    }

    pub fn total(&self, total: Total) -> u32 {
        match total {
            Total::TopSubtotal => self.sum(ScoreCategory::upper_section()),
            Total::Bonus => {
                if self.total(Total::TopSubtotal) >= UPPER_BONUS_THRESHOLD {
                    UPPER_BONUS
                } else {
                    0
                }
            }
            Total::TopTotal => self.total(Total::TopSubtotal) + self.total(Total::Bonus),
            Total::BottomTotal => self.sum(ScoreCategory::lower_section()),
            Total::GrandTotal => self.total(Total::TopTotal) + self.total(Total::BottomTotal),
        }
    }

    fn sum(&self, categories: impl Iterator<Item = ScoreCategory>) -> u32 {
        categories
            .filter_map(|category| self.value(category))
            .sum()
    }
}

/// Scores `row` with everything evaluated live from `dice`.
pub fn score(dice: &DiceSet, scorecard: &Scorecard, row: impl Into<ScoreRow>) -> u32 {
    Scorer::new(dice, scorecard).value(row).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn dice(values: [u8; 5]) -> DiceSet {
        DiceSet::try_from(values).unwrap()
    }

    fn live(values: [u8; 5], category: ScoreCategory) -> u32 {
        score(&dice(values), &Scorecard::default(), category)
    }

    #[test]
    fn tallies_count_wildcards_towards_every_face() {
        let t = Tallies::new(&dice([0, 2, 2, 5, 0]));
        assert_eq!(t.wild_count(), 2);
        assert_eq!(t.multiplier(), 3);
        assert_eq!(t.with_wild(2), 4);
        assert_eq!(t.with_wild(6), 2);
        assert_eq!(t.without_wild(2), 2);
        assert_eq!(t.without_wild(6), 0);
        assert_eq!(t.dice_sum(), 9);
    }

    #[test]
    fn upper_section_without_wilds() {
        assert_eq!(live([1, 1, 3, 5, 1], ScoreCategory::Aces), 3);
        assert_eq!(live([6, 6, 3, 5, 1], ScoreCategory::Sixes), 12);
        assert_eq!(live([6, 6, 3, 5, 1], ScoreCategory::Twos), 0);
    }

    #[test]
    fn upper_section_with_wilds() {
        // Two fours plus one wild count as three fours, doubled.
        assert_eq!(live([4, 4, 0, 1, 2], ScoreCategory::Fours), 24);
    }

    #[test]
    fn of_a_kind_without_wilds() {
        assert_eq!(live([3, 3, 3, 5, 6], ScoreCategory::ThreeOfKind), 20);
        assert_eq!(live([3, 3, 3, 5, 6], ScoreCategory::FourOfKind), 0);
        assert_eq!(live([2, 2, 2, 2, 6], ScoreCategory::FourOfKind), 14);
    }

    #[test]
    fn of_a_kind_with_few_wilds_fills_in_the_highest_match() {
        // Sixes reach three with the wild: (16 + 1 * 6) * 2.
        assert_eq!(live([6, 6, 0, 1, 3], ScoreCategory::ThreeOfKind), 44);
        // Only the twos reach four: (7 + 1 * 2) * 2.
        assert_eq!(live([2, 2, 2, 0, 1], ScoreCategory::FourOfKind), 18);
    }

    #[test]
    fn of_a_kind_with_many_wilds_counts_ten_per_wild() {
        // Three wilds: (1 + 2 + 3 * 10) * 4.
        assert_eq!(live([0, 0, 0, 1, 2], ScoreCategory::ThreeOfKind), 132);
        // Three wilds fall short of four, so the highest face reaching four fills in: (3 + 3 * 2) * 4.
        assert_eq!(live([0, 0, 0, 1, 2], ScoreCategory::FourOfKind), 36);
        // Four wilds: (3 + 4 * 10) * 5.
        assert_eq!(live([0, 0, 0, 0, 3], ScoreCategory::FourOfKind), 215);
    }

    #[test]
    fn full_house() {
        assert_eq!(live([2, 2, 3, 3, 3], ScoreCategory::FullHouse), 25);
        assert_eq!(live([6, 6, 1, 1, 1], ScoreCategory::FullHouse), 25);
        assert_eq!(live([2, 2, 2, 2, 3], ScoreCategory::FullHouse), 0);
        assert_eq!(live([2, 2, 3, 3, 4], ScoreCategory::FullHouse), 0);
        // Any wild lifts every face off zero, so the shape test fails.
        assert_eq!(live([2, 2, 3, 3, 0], ScoreCategory::FullHouse), 0);
    }

    #[test]
    fn straights_without_wilds() {
        let roll = [2, 3, 4, 5, 6];
        assert_eq!(live(roll, ScoreCategory::LargeStraight), 40);
        assert_eq!(live(roll, ScoreCategory::SmallStraight), 30);
        assert_eq!(live(roll, ScoreCategory::Chance), 20);
        assert_eq!(live([1, 2, 3, 4, 5], ScoreCategory::LargeStraight), 40);
        assert_eq!(live([1, 2, 3, 4, 6], ScoreCategory::LargeStraight), 0);
        assert_eq!(live([1, 1, 3, 4, 6], ScoreCategory::SmallStraight), 0);
    }

    #[test]
    fn straights_with_wilds() {
        // 1+1 (3, 4) + 2 (5, 6) + 1 wild.
        assert_eq!(live([3, 4, 5, 6, 0], ScoreCategory::SmallStraight), 60);
        assert_eq!(live([2, 3, 4, 5, 0], ScoreCategory::LargeStraight), 80);
        assert_eq!(live([2, 3, 0, 5, 6], ScoreCategory::LargeStraight), 80);
    }

    #[test]
    fn yotsee_first_and_bonus() {
        let roll = dice([1, 1, 1, 1, 1]);
        let empty = Scorecard::default();
        assert_eq!(score(&roll, &empty, ScoreCategory::Yotsee), 50);
        let committed = empty.record(ScoreCategory::Yotsee, 50).unwrap();
        assert_eq!(score(&roll, &committed, ScoreCategory::Yotsee), 150);
    }

    #[test]
    fn yotsee_with_wilds() {
        assert_eq!(live([4, 0, 4, 4, 0], ScoreCategory::Yotsee), 150);
        let all_wild = dice([0, 0, 0, 0, 0]);
        let empty = Scorecard::default();
        assert_eq!(score(&all_wild, &empty, ScoreCategory::Yotsee), 500);
        let committed = empty.record(ScoreCategory::Yotsee, 500).unwrap();
        assert_eq!(score(&all_wild, &committed, ScoreCategory::Yotsee), 1500);
    }

    #[test]
    fn mixed_faces_keep_the_committed_yotsee() {
        let roll = dice([1, 2, 1, 1, 1]);
        assert_eq!(score(&roll, &Scorecard::default(), ScoreCategory::Yotsee), 0);
        let committed = Scorecard::default()
            .record(ScoreCategory::Yotsee, 150)
            .unwrap();
        assert_eq!(score(&roll, &committed, ScoreCategory::Yotsee), 150);
    }

    #[test]
    fn scratched_yotsee_scores_as_a_first_yotsee() {
        let scratched = Scorecard::default()
            .record(ScoreCategory::Yotsee, 0)
            .unwrap();
        assert_eq!(score(&dice([5, 5, 5, 5, 5]), &scratched, ScoreCategory::Yotsee), 50);
    }

    #[test]
    fn chance_counts_wilds_as_sixes() {
        assert_eq!(live([0, 1, 2, 3, 4], ScoreCategory::Chance), 32);
    }

    #[test]
    fn totals_from_committed_scores() {
        let mut scorecard = Scorecard::default();
        for (category, value) in [
            (ScoreCategory::Aces, 3),
            (ScoreCategory::Twos, 6),
            (ScoreCategory::Threes, 9),
            (ScoreCategory::Fours, 12),
            (ScoreCategory::Fives, 15),
            (ScoreCategory::Sixes, 18),
            (ScoreCategory::Chance, 22),
            (ScoreCategory::Yotsee, 50),
        ] {
            scorecard = scorecard.record(category, value).unwrap();
        }
        let scorer = Scorer::new(&DiceSet::default(), &scorecard).with_preview(Preview::Nothing);
        assert_eq!(scorer.total(Total::TopSubtotal), 63);
        assert_eq!(scorer.total(Total::Bonus), 35);
        assert_eq!(scorer.total(Total::TopTotal), 98);
        assert_eq!(scorer.total(Total::BottomTotal), 72);
        assert_eq!(scorer.total(Total::GrandTotal), 170);
    }

    #[test]
    fn bonus_needs_sixty_three() {
        let scorecard = Scorecard::default()
            .record(ScoreCategory::Sixes, 30)
            .unwrap()
            .record(ScoreCategory::Fives, 25)
            .unwrap()
            .record(ScoreCategory::Fours, 4)
            .unwrap();
        let scorer = Scorer::new(&DiceSet::default(), &scorecard).with_preview(Preview::Nothing);
        assert_eq!(scorer.total(Total::TopSubtotal), 59);
        assert_eq!(scorer.total(Total::Bonus), 0);
        // Previewing three aces on top pushes the subtotal to 62, still short.
        let roll = dice([1, 1, 1, 6, 6]);
        let scorer = Scorer::new(&roll, &scorecard).with_preview(Preview::Only(ScoreCategory::Aces));
        assert_eq!(scorer.total(Total::TopSubtotal), 62);
        assert_eq!(scorer.total(Total::Bonus), 0);
    }

    #[test]
    fn preview_only_shows_one_live_cell() {
        let roll = dice([5, 5, 5, 2, 2]);
        let scorecard = Scorecard::default()
            .record(ScoreCategory::Twos, 2)
            .unwrap();
        let scorer = Scorer::new(&roll, &scorecard)
            .with_preview(Preview::Only(ScoreCategory::Fives));
        assert_eq!(scorer.value(ScoreCategory::Fives), Some(15));
        assert_eq!(scorer.value(ScoreCategory::Twos), Some(2));
        assert_eq!(scorer.value(ScoreCategory::FullHouse), None);
        assert_eq!(scorer.value(Total::TopSubtotal), Some(17));
        assert_eq!(scorer.value(Total::BottomTotal), Some(0));
    }

    #[test]
    fn everything_live_sums_every_category() {
        let roll = dice([2, 3, 4, 5, 6]);
        let scorecard = Scorecard::default();
        let scorer = Scorer::new(&roll, &scorecard);
        let upper: u32 = ScoreCategory::upper_section().map(|c| scorer.live(c)).sum();
        assert_eq!(upper, 20);
        assert_eq!(scorer.total(Total::TopSubtotal), 20);
        // 3oak 0, 4oak 0, full house 0, small 30, large 40, yotsee 0, chance 20.
        assert_eq!(scorer.total(Total::BottomTotal), 90);
        assert_eq!(scorer.total(Total::GrandTotal), 110);
        for category in ScoreCategory::iter() {
            assert!(scorer.value(category).is_some());
        }
    }
}
