use enum_map::{Enum, EnumMap};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Die {
    value: u8,
    is_locked: bool,
}

/// Always exactly five dice. Every update hands back a new set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DiceSet([Die; DiceSet::NUM_DICE]);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Enum, EnumIter, Display)]
pub enum ScoreCategory {
    Aces,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    #[strum(to_string = "3 of a Kind")]
    ThreeOfKind,
    #[strum(to_string = "4 of a Kind")]
    FourOfKind,
    #[strum(to_string = "Full House")]
    FullHouse,
    #[strum(to_string = "Small Straight")]
    SmallStraight,
    #[strum(to_string = "Large Straight")]
    LargeStraight,
    Yotsee,
    Chance,
}

/// The read-only rows derived from the thirteen committed categories.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter, Display)]
pub enum Total {
    #[strum(to_string = "Top Sub Total")]
    TopSubtotal,
    Bonus,
    #[strum(to_string = "Top Total")]
    TopTotal,
    #[strum(to_string = "Bottom Total")]
    BottomTotal,
    #[strum(to_string = "Grand Total")]
    GrandTotal,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ScoreRow {
    Category(ScoreCategory),
    Total(Total),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Hash)]
pub struct Scorecard {
    scores: EnumMap<ScoreCategory, Option<u32>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerStats {
    pub games_played: u32,
    pub high_score: u32,
    pub avg_score: f64,
    pub total_yotsees: u32,
    pub avg_yotsees: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub number: usize,
    pub name: String,
    pub scorecard: Scorecard,
    /// Bonus Yotsees scored on top of the first one. Only ever grows.
    pub yotsee_bonus_count: u8,
    pub stats: PlayerStats,
}

#[derive(Debug, Eq, PartialEq, Error)]
pub enum ConstructionError {
    #[error("die value {got} is larger than {max}")]
    ValueTooLarge { max: u8, got: u8 },
    #[error("die index {got} is out of range, there are only {len} dice")]
    IndexOutOfRange { len: usize, got: usize },
}

#[derive(Debug, Eq, PartialEq, Error)]
pub enum ScoringError {
    #[error("{category} has already been scored")]
    AlreadyScored { category: ScoreCategory },
}

impl Die {
    pub const WILD: u8 = 0;
    pub const MAX_FACE: u8 = 6;

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn is_wild(&self) -> bool {
        self.value == Self::WILD
    }

    pub fn with_value(self, value: u8) -> Result<Self, ConstructionError> {
        Ok(Self {
            value: Self::check_value(value)?,
            ..self
        })
    }

    pub fn with_lock(self, is_locked: bool) -> Self {
        Self { is_locked, ..self }
    }

    fn check_value(value: u8) -> Result<u8, ConstructionError> {
        if value > Self::MAX_FACE {
            Err(ConstructionError::ValueTooLarge {
                max: Self::MAX_FACE,
                got: value,
            })
        } else {
            Ok(value)
        }
    }
}

impl TryFrom<u8> for Die {
    type Error = ConstructionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(Self {
            value: Self::check_value(value)?,
            is_locked: false,
        })
    }
}

impl DiceSet {
    pub const NUM_DICE: usize = 5;

    pub fn dice(&self) -> &[Die; Self::NUM_DICE] {
        &self.0
    }

    pub fn values(&self) -> [u8; Self::NUM_DICE] {
        self.0.map(|die| die.value)
    }

    pub fn locked_count(&self) -> usize {
        self.0.iter().filter(|die| die.is_locked).count()
    }

    pub fn unlocked_count(&self) -> usize {
        Self::NUM_DICE - self.locked_count()
    }

    pub fn all_locked(&self) -> bool {
        self.locked_count() == Self::NUM_DICE
    }

    pub fn die(&self, index: usize) -> Result<&Die, ConstructionError> {
        self.0.get(index).ok_or(ConstructionError::IndexOutOfRange {
            len: Self::NUM_DICE,
            got: index,
        })
    }

    pub fn with_lock_toggled(&self, index: usize) -> Result<Self, ConstructionError> {
        let die = *self.die(index)?;
        let mut dice = self.0;
        dice[index] = die.with_lock(!die.is_locked);
        Ok(Self(dice))
    }

    pub fn with_all_locks(&self, is_locked: bool) -> Self {
        Self(self.0.map(|die| die.with_lock(is_locked)))
    }

    /// Draws a new face for every unlocked die. Locked dice are left exactly as they were.
    pub fn rerolled<F>(&self, mut roll_face: F) -> Result<Self, ConstructionError>
    where
        F: FnMut() -> u8,
    {
        let mut dice = self.0;
        for die in dice.iter_mut().filter(|die| !die.is_locked) {
            *die = die.with_value(roll_face())?;
        }
        Ok(Self(dice))
    }
}

/// A fresh turn starts with five unlocked aces.
impl Default for DiceSet {
    fn default() -> Self {
        Self(
            [Die {
                value: 1,
                is_locked: false,
            }; Self::NUM_DICE],
        )
    }
}

impl TryFrom<[u8; DiceSet::NUM_DICE]> for DiceSet {
    type Error = ConstructionError;

    fn try_from(values: [u8; DiceSet::NUM_DICE]) -> Result<Self, Self::Error> {
        let mut dice = [Die::default(); Self::NUM_DICE];
        for (die, value) in dice.iter_mut().zip(values) {
            *die = Die::try_from(value)?;
        }
        Ok(Self(dice))
    }
}

impl ScoreCategory {
    pub const COUNT: usize = <ScoreCategory as Enum>::LENGTH;

    pub fn index(self) -> usize {
        self.into_usize()
    }

    /// Panics if `index` is not below [`ScoreCategory::COUNT`].
    pub fn from_index(index: usize) -> Self {
        <ScoreCategory as Enum>::from_usize(index)
    }

    pub fn is_upper_section(&self) -> bool {
        matches!(
            self,
            ScoreCategory::Aces
                | ScoreCategory::Twos
                | ScoreCategory::Threes
                | ScoreCategory::Fours
                | ScoreCategory::Fives
                | ScoreCategory::Sixes
        )
    }

    pub fn is_lower_section(&self) -> bool {
        !self.is_upper_section()
    }

    /// The face an upper-section category counts, or `None` for the lower section.
    pub fn face(&self) -> Option<u8> {
        if self.is_upper_section() {
            Some(self.index() as u8 + 1)
        } else {
            None
        }
    }

    pub fn upper_section() -> impl Iterator<Item = ScoreCategory> {
        Self::iter().filter(ScoreCategory::is_upper_section)
    }

    pub fn lower_section() -> impl Iterator<Item = ScoreCategory> {
        Self::iter().filter(ScoreCategory::is_lower_section)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn tip(&self) -> &'static str {
        match self {
            ScoreCategory::Aces => "ADD ACES ONLY",
            ScoreCategory::Twos => "ADD TWOS ONLY",
            ScoreCategory::Threes => "ADD THREES ONLY",
            ScoreCategory::Fours => "ADD FOURS ONLY",
            ScoreCategory::Fives => "ADD FIVES ONLY",
            ScoreCategory::Sixes => "ADD SIXES ONLY",
            ScoreCategory::ThreeOfKind | ScoreCategory::FourOfKind | ScoreCategory::Chance => {
                "ADD TOTAL OF DICE"
            }
            ScoreCategory::FullHouse => "SCORE 25",
            ScoreCategory::SmallStraight => "SCORE 30",
            ScoreCategory::LargeStraight => "SCORE 40",
            ScoreCategory::Yotsee => "SCORE 50",
        }
    }
}

impl Total {
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn tip(&self) -> Option<&'static str> {
        match self {
            Total::Bonus => Some("SCORE 35 IF TOP SUBTOTAL >= 63"),
            _ => None,
        }
    }
}

impl ScoreRow {
    /// Every row of the scorecard, top to bottom.
    pub fn board() -> impl Iterator<Item = ScoreRow> {
        ScoreCategory::upper_section()
            .map(ScoreRow::Category)
            .chain([Total::TopSubtotal, Total::Bonus, Total::TopTotal].map(ScoreRow::Total))
            .chain(ScoreCategory::lower_section().map(ScoreRow::Category))
            .chain([Total::BottomTotal, Total::GrandTotal].map(ScoreRow::Total))
    }

    pub fn label(&self) -> String {
        match self {
            ScoreRow::Category(category) => category.label(),
            ScoreRow::Total(total) => total.label(),
        }
    }
}

impl From<ScoreCategory> for ScoreRow {
    fn from(category: ScoreCategory) -> Self {
        ScoreRow::Category(category)
    }
}

impl From<Total> for ScoreRow {
    fn from(total: Total) -> Self {
        ScoreRow::Total(total)
    }
}

impl Scorecard {
    pub fn get(&self, category: ScoreCategory) -> Option<u32> {
        self.scores[category]
    }

    pub fn is_committed(&self, category: ScoreCategory) -> bool {
        self.scores[category].is_some()
    }

    /// A committed zero (a scratched Yotsee) does not count.
    pub fn has_yotsee(&self) -> bool {
        self.get(ScoreCategory::Yotsee).is_some_and(|score| score > 0)
    }

    pub fn is_full(&self) -> bool {
        self.uncommitted().next().is_none()
    }

    pub fn uncommitted(&self) -> impl Iterator<Item = ScoreCategory> + '_ {
        ScoreCategory::iter().filter(|&category| !self.is_committed(category))
    }

    /// Returns a new scorecard with `score` committed to `category`. Yotsee is the only category
    /// which may be recorded more than once, since bonus Yotsees overwrite it.
    pub fn record(&self, category: ScoreCategory, score: u32) -> Result<Self, ScoringError> {
        if category != ScoreCategory::Yotsee && self.is_committed(category) {
            return Err(ScoringError::AlreadyScored { category });
        }
        let mut scores = self.scores;
        scores[category] = Some(score);
        Ok(Self { scores })
    }
}

impl Player {
    pub fn new(number: usize, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            scorecard: Scorecard::default(),
            yotsee_bonus_count: 0,
            stats: PlayerStats::default(),
        }
    }

    pub fn scored(
        &self,
        category: ScoreCategory,
        score: u32,
        is_bonus: bool,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            scorecard: self.scorecard.record(category, score)?,
            yotsee_bonus_count: if is_bonus {
                self.yotsee_bonus_count.saturating_add(1)
            } else {
                self.yotsee_bonus_count
            },
            ..self.clone()
        })
    }

    /// Folds a finished game into the running stats.
    pub fn with_finished_game(&self, grand_total: u32) -> Self {
        let yotsees = if self.scorecard.has_yotsee() {
            1 + self.yotsee_bonus_count as u32
        } else {
            0
        };
        let played = self.stats.games_played + 1;
        let n = played as f64;
        let stats = PlayerStats {
            games_played: played,
            high_score: self.stats.high_score.max(grand_total),
            avg_score: self.stats.avg_score + (grand_total as f64 - self.stats.avg_score) / n,
            total_yotsees: self.stats.total_yotsees + yotsees,
            avg_yotsees: self.stats.avg_yotsees + (yotsees as f64 - self.stats.avg_yotsees) / n,
        };
        Self {
            stats,
            ..self.clone()
        }
    }
}
