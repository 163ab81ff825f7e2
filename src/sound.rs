use strum_macros::{AsRefStr, Display, EnumIter};

/// Every sound the game can ask for. Playback belongs to whoever implements [`SoundSink`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Sound {
    Click,
    Endgame,
    Lock,
    Unlock,
    Mad,
    Rollem,
    /// Loops from the start of a roll until it is stopped.
    Rolling,
    Score,
    Ugotit,
    Wild,
    Yotsee,
    EndRoll0,
    EndRoll1,
    EndRoll2,
    EndRoll3,
    EndRoll4,
    EndRoll5,
}

impl Sound {
    /// The end-of-roll sound for however many dice were in play. Clamped to five.
    pub fn end_roll(unlocked: usize) -> Self {
        match unlocked {
            0 => Sound::EndRoll0,
            1 => Sound::EndRoll1,
            2 => Sound::EndRoll2,
            3 => Sound::EndRoll3,
            4 => Sound::EndRoll4,
            _ => Sound::EndRoll5,
        }
    }
}

pub trait SoundSink {
    fn play(&mut self, sound: Sound);

    /// Only matters for looping sounds.
    fn stop(&mut self, _sound: Sound) {}
}

/// Remembers everything it was asked to do, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundLog {
    pub played: Vec<Sound>,
    pub stopped: Vec<Sound>,
}

impl SoundLog {
    pub fn last(&self) -> Option<Sound> {
        self.played.last().copied()
    }
}

impl SoundSink for SoundLog {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }

    fn stop(&mut self, sound: Sound) {
        self.stopped.push(sound);
    }
}

/// Drops every sound.
impl SoundSink for () {
    fn play(&mut self, _sound: Sound) {}
}
