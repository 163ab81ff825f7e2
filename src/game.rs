//! The turn state machine: rolling, locking, scoring and handing the dice to the next player.
//!
//! A turn goes Idle -> Rolling -> Idle up to three times. Once three rolls are done, or the
//! player has locked all five dice, the turn is in its scoring phase and confirming commits the
//! selected category. Scoring is a predicate on the state, not a state of its own.
//!
//! Rolling is driven by the host: [`Game::begin_roll`] hands back a [`TickToken`], and the host
//! calls [`Game::tick`] with it every [`Game::tick_interval`] until `tick` stops returning a token.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GameConfig};
use crate::cursor::{self, Direction};
use crate::dice::DieSource;
use crate::scoring::{Preview, Scorer};
use crate::sound::{Sound, SoundSink};
use crate::types::{DiceSet, Die, Player, ScoreCategory, ScoreRow, ScoringError, Total};

pub const MAX_ROLLS: u8 = 3;

/// Permission for one roll tick. Goes stale as soon as the roll it belongs to ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TickToken {
    generation: u64,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Input {
    Confirm,
    ToggleLock(usize),
    Move(Direction),
}

/// Why a command did nothing.
#[derive(Debug, Eq, PartialEq, Error)]
pub enum Rejected {
    #[error("the dice are still rolling")]
    Rolling,
    #[error("the dice are not rolling")]
    NotRolling,
    #[error("dice can't be locked before the first roll")]
    MustRollFirst,
    #[error("locks are final after the last roll")]
    LocksFinal,
    #[error("the turn is not in its scoring phase")]
    NotScoring,
    #[error("the turn has to be scored before rolling again")]
    ScoringPending,
    #[error("there is no die {0}")]
    NoSuchDie(usize),
    #[error("the game is over")]
    GameOver,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

pub struct Game<S, K> {
    dice: DiceSet,
    is_rolling: bool,
    rolls_complete: u8,
    current_player: usize,
    selection: ScoreCategory,
    players: Vec<Player>,
    roll_generation: u64,
    is_finished: bool,
    tick_interval: Duration,
    source: S,
    sound: K,
}

impl Input {
    /// Enter/space confirm, 1-5 toggle the dice, up/W and down/S move the selection.
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            13 | 32 => Some(Input::Confirm),
            49..=53 => Some(Input::ToggleLock((code - 49) as usize)),
            38 | 87 => Some(Input::Move(Direction::Up)),
            40 | 83 => Some(Input::Move(Direction::Down)),
            _ => None,
        }
    }
}

impl<S: DieSource, K: SoundSink> Game<S, K> {
    pub fn new(config: &GameConfig, source: S, mut sound: K) -> Result<Self, ConfigError> {
        config.validate()?;
        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(number, name)| Player::new(number, name.clone()))
            .collect();
        sound.play(Sound::Rollem);
        Ok(Self {
            dice: DiceSet::default(),
            is_rolling: false,
            rolls_complete: 0,
            current_player: 0,
            selection: ScoreCategory::Aces,
            players,
            roll_generation: 0,
            is_finished: false,
            tick_interval: config.tick_interval(),
            source,
            sound,
        })
    }

    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    pub fn is_rolling(&self) -> bool {
        self.is_rolling
    }

    pub fn rolls_complete(&self) -> u8 {
        self.rolls_complete
    }

    pub fn rolls_left(&self) -> u8 {
        MAX_ROLLS - self.rolls_complete
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn selection(&self) -> ScoreCategory {
        self.selection
    }

    pub fn is_finished(&self) -> bool {
        self.is_finished
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn sound(&self) -> &K {
        &self.sound
    }

    pub fn yotsee_bonus_count(&self, player: usize) -> Option<u8> {
        self.players.get(player).map(|p| p.yotsee_bonus_count)
    }

    /// All rolls used up, or every die locked.
    pub fn is_scoring(&self) -> bool {
        self.rolls_complete == MAX_ROLLS || self.dice.all_locked()
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_rolling {
            "End Roll"
        } else if self.is_scoring() {
            "End Turn"
        } else {
            "Begin Roll"
        }
    }

    /// What the scorecard shows for `player` in `row`. Only the current player's selected cell
    /// previews a live score, and only during the scoring phase. Everything else is whatever has
    /// been committed. `None` for an empty cell or a player who isn't in the game.
    pub fn compute_score(&self, player: usize, row: impl Into<ScoreRow>) -> Option<u32> {
        let scorecard = &self.players.get(player)?.scorecard;
        let preview = if player == self.current_player && self.is_scoring() {
            Preview::Only(self.selection)
        } else {
            Preview::Nothing
        };
        Scorer::new(&self.dice, scorecard)
            .with_preview(preview)
            .value(row)
    }

    pub fn begin_roll(&mut self) -> Result<TickToken, Rejected> {
        if self.is_finished {
            return Err(Rejected::GameOver);
        }
        if self.is_rolling {
            return Err(Rejected::Rolling);
        }
        if self.is_scoring() {
            return Err(Rejected::ScoringPending);
        }
        self.is_rolling = true;
        self.roll_generation += 1;
        self.sound.play(Sound::Rolling);
        debug!(rolls_complete = self.rolls_complete, "begin roll");
        Ok(TickToken {
            generation: self.roll_generation,
        })
    }

    /// Re-rolls every unlocked die. Returns the token to schedule the next tick with, or `None`
    /// once the roll it was issued for has ended, in which case nothing is touched.
    pub fn tick(&mut self, token: TickToken) -> Option<TickToken> {
        if !self.is_rolling || token.generation != self.roll_generation {
            return None;
        }
        let source = &mut self.source;
        match self.dice.rerolled(|| source.roll_face()) {
            Ok(dice) => self.dice = dice,
            Err(err) => warn!(%err, "die source produced an invalid face"),
        }
        Some(token)
    }

    pub fn end_roll(&mut self) -> Result<(), Rejected> {
        if self.is_finished {
            return Err(Rejected::GameOver);
        }
        if !self.is_rolling {
            return Err(Rejected::NotRolling);
        }
        self.is_rolling = false;
        self.roll_generation += 1;
        self.sound.stop(Sound::Rolling);
        self.rolls_complete += 1;
        let sound = self.end_roll_sound();
        self.sound.play(sound);
        if self.rolls_complete == MAX_ROLLS {
            self.dice = self.dice.with_all_locks(true);
        }
        self.reseat_selection();
        debug!(
            rolls_complete = self.rolls_complete,
            dice = ?self.dice.values(),
            %sound,
            "end roll"
        );
        Ok(())
    }

    fn end_roll_sound(&self) -> Sound {
        let faces = self
            .dice
            .dice()
            .iter()
            .filter(|die| !die.is_wild())
            .map(Die::value);
        // No faces at all (five wilds) counts as matching.
        if faces.clone().min() == faces.max() {
            Sound::Yotsee
        } else if self
            .dice
            .dice()
            .iter()
            .any(|die| die.is_wild() && !die.is_locked())
        {
            Sound::Wild
        } else {
            Sound::end_roll(self.dice.unlocked_count())
        }
    }

    pub fn toggle_lock(&mut self, index: usize) -> Result<(), Rejected> {
        if self.is_finished {
            return Err(Rejected::GameOver);
        }
        if self.is_rolling {
            return Err(Rejected::Rolling);
        }
        if self.rolls_complete == 0 {
            return Err(Rejected::MustRollFirst);
        }
        if self.rolls_complete == MAX_ROLLS {
            return Err(Rejected::LocksFinal);
        }
        let dice = self
            .dice
            .with_lock_toggled(index)
            .map_err(|_| Rejected::NoSuchDie(index))?;
        let is_locked = dice.dice()[index].is_locked();
        self.dice = dice;
        self.sound.play(if is_locked { Sound::Lock } else { Sound::Unlock });
        self.reseat_selection();
        debug!(index, is_locked, "toggle die lock");
        Ok(())
    }

    pub fn commit_score(&mut self) -> Result<(), Rejected> {
        if self.is_finished {
            return Err(Rejected::GameOver);
        }
        if self.is_rolling {
            return Err(Rejected::Rolling);
        }
        if !self.is_scoring() {
            return Err(Rejected::NotScoring);
        }
        let category = self.selection;
        let player = &self.players[self.current_player];
        let is_bonus = category == ScoreCategory::Yotsee && player.scorecard.has_yotsee();
        let score = Scorer::new(&self.dice, &player.scorecard).live(category);
        let player = player.scored(category, score, is_bonus)?;
        debug!(player = %player.name, %category, score, is_bonus, "commit score");
        self.players[self.current_player] = player;
        self.sound.play(Sound::Score);

        self.rolls_complete = 0;
        self.dice = self.dice.with_all_locks(false);
        match self.next_player() {
            Some(next_player) => {
                self.current_player = next_player;
                if let Some(next) = cursor::next(
                    &self.players[next_player],
                    &self.dice,
                    None,
                    Direction::Down,
                ) {
                    self.selection = next;
                }
            }
            None => self.finish(),
        }
        Ok(())
    }

    pub fn move_selection(&mut self, direction: Direction) -> Result<ScoreCategory, Rejected> {
        if self.is_finished {
            return Err(Rejected::GameOver);
        }
        if !self.is_scoring() {
            return Err(Rejected::NotScoring);
        }
        if let Some(next) = cursor::next(
            &self.players[self.current_player],
            &self.dice,
            Some(self.selection),
            direction,
        ) {
            self.selection = next;
        }
        debug!(selection = %self.selection, ?direction, "move selection");
        Ok(self.selection)
    }

    pub fn confirm(&mut self) -> Result<Option<TickToken>, Rejected> {
        if self.is_rolling {
            self.end_roll().map(|()| None)
        } else if self.is_scoring() {
            self.commit_score().map(|()| None)
        } else {
            self.begin_roll().map(Some)
        }
    }

    /// Runs `input`, quietly ignoring it if it isn't allowed right now. Returns a token when the
    /// input started a roll.
    pub fn handle(&mut self, input: Input) -> Option<TickToken> {
        let outcome = match input {
            Input::Confirm => self.confirm(),
            Input::ToggleLock(index) => self.toggle_lock(index).map(|()| None),
            Input::Move(direction) => self.move_selection(direction).map(|_| None),
        };
        match outcome {
            Ok(token) => token,
            Err(reason) => {
                debug!(?input, %reason, "ignored input");
                None
            }
        }
    }

    /// The next player in turn order with an open category. A full card gets no more turns,
    /// even if it could still take a Yotsee bonus.
    fn next_player(&self) -> Option<usize> {
        let len = self.players.len();
        (1..=len)
            .map(|step| (self.current_player + step) % len)
            .find(|&i| !self.players[i].scorecard.is_full())
    }

    /// Keeps the selection on something the player can pick once the scoring phase starts. The
    /// previous turn may have aimed it at a Yotsee bonus the new dice don't make.
    fn reseat_selection(&mut self) {
        if !self.is_scoring() {
            return;
        }
        let player = &self.players[self.current_player];
        if cursor::is_selectable(player, &self.dice, self.selection) {
            return;
        }
        if let Some(next) = cursor::next(player, &self.dice, Some(self.selection), Direction::Down)
        {
            self.selection = next;
        }
    }

    fn finish(&mut self) {
        self.is_finished = true;
        for i in 0..self.players.len() {
            let player = &self.players[i];
            let grand_total = Scorer::new(&self.dice, &player.scorecard)
                .with_preview(Preview::Nothing)
                .total(Total::GrandTotal);
            info!(player = %player.name, grand_total, "game over");
            self.players[i] = player.with_finished_game(grand_total);
        }
        self.sound.play(Sound::Endgame);
    }
}
