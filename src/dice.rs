use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of equally likely outcomes drawn per die. One of them is the wildcard.
pub const DRAW_OUTCOMES: u8 = 121;
/// How many draws land on each ordinary face.
const DRAWS_PER_FACE: u8 = 20;

/// Anything that can produce die faces on `0..=6`, where `0` is the wildcard.
///
/// Kept as a trait so the game can be driven by a seeded or scripted source in tests.
pub trait DieSource {
    fn roll_face(&mut self) -> u8;
}

pub struct RandomDieSource<R> {
    rng: R,
}

/// Replays a fixed list of faces, cycling once it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedDieSource {
    faces: Vec<u8>,
    next: usize,
}

/// Maps a uniform draw on `0..=120` to a face. `0` is the wildcard (1/121), then each face gets
/// a run of twenty draws (20/121 each).
pub fn face_from_draw(draw: u8) -> u8 {
    if draw == 0 {
        return 0;
    }
    (draw - 1) / DRAWS_PER_FACE + 1
}

impl<R: Rng> RandomDieSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDieSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> DieSource for RandomDieSource<R> {
    fn roll_face(&mut self) -> u8 {
        face_from_draw(self.rng.random_range(0..DRAW_OUTCOMES))
    }
}

impl ScriptedDieSource {
    /// Panics if `faces` is empty.
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        let faces = faces.into();
        assert!(!faces.is_empty(), "a scripted source needs at least one face");
        Self { faces, next: 0 }
    }
}

impl DieSource for ScriptedDieSource {
    fn roll_face(&mut self) -> u8 {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}
