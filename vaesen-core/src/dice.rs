//! Six-sided dice pools.
//!
//! Every die showing a 6 is a success. Nothing else about the faces matters
//! except on a push, where the 6s are kept and the rest rolled again.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SUCCESS_FACE: u8 = 6;

/// Faces of one roll and the number of 6s among them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub faces: Vec<u8>,
    pub successes: u32,
}

fn count_successes(faces: &[u8]) -> u32 {
    faces.iter().filter(|&&f| f == SUCCESS_FACE).count() as u32
}

impl DiceRoll {
    /// Build a roll from known faces.
    pub fn from_faces(faces: Vec<u8>) -> Self {
        let successes = count_successes(&faces);
        Self { faces, successes }
    }

    pub fn roll_with_rng<R: Rng + ?Sized>(pool: u32, rng: &mut R) -> Self {
        let faces = (0..pool).map(|_| rng.gen_range(1..=6u8)).collect();
        Self::from_faces(faces)
    }

    pub fn pool(&self) -> u32 {
        self.faces.len() as u32
    }

    /// Keep every 6 and reroll everything else. Kept 6s come first.
    ///
    /// Works from the faces alone; a stale `successes` count is ignored.
    pub fn push_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let (mut faces, rerolled): (Vec<u8>, Vec<u8>) =
            self.faces.iter().partition(|&&f| f == SUCCESS_FACE);
        faces.extend(rerolled.iter().map(|_| rng.gen_range(1..=6u8)));
        Self::from_faces(faces)
    }

    /// Number of dice a push would roll again.
    pub fn rerollable(&self) -> u32 {
        self.faces.iter().filter(|&&f| f != SUCCESS_FACE).count() as u32
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.faces.iter().map(|d| d.to_string()).collect();
        let noun = if self.successes == 1 { "success" } else { "successes" };
        write!(f, "[{}] = {} {}", faces.join(", "), self.successes, noun)
    }
}

/// Roll `pool` dice with the thread-local RNG.
pub fn roll_dice(pool: u32) -> DiceRoll {
    DiceRoll::roll_with_rng(pool, &mut rand::thread_rng())
}
