//! Rules engine for Yotsee, a Yahtzee variant with a wildcard die face.
//!
//! The crate never draws or plays anything. A front end asks [`Game`] for scores and
//! forwards the player's input to it, and gets told which [`Sound`] to play through its
//! [`SoundSink`].

pub mod config;
pub mod cursor;
pub mod dice;
pub mod game;
pub mod scoring;
pub mod sound;
pub mod types;

pub use config::{ConfigError, GameConfig};
pub use cursor::Direction;
pub use dice::{DieSource, RandomDieSource, ScriptedDieSource};
pub use game::{Game, Input, Rejected, TickToken};
pub use scoring::{Preview, Scorer, score};
pub use sound::{Sound, SoundLog, SoundSink};
pub use types::{DiceSet, Die, Player, ScoreCategory, ScoreRow, Scorecard, Total};
