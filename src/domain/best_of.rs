use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Длина серии. Только нечётные значения из закрытого набора.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
pub enum BestOf {
    Three,
    Five,
    Seven,
    Nine,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("best of {0} is not supported (expected 3, 5, 7 or 9)")]
pub struct InvalidBestOf(pub u8);

impl BestOf {
    pub const ALL: [BestOf; 4] = [BestOf::Three, BestOf::Five, BestOf::Seven, BestOf::Nine];

    /// Количество карт в серии.
    pub fn count(&self) -> usize {
        match self {
            BestOf::Three => 3,
            BestOf::Five => 5,
            BestOf::Seven => 7,
            BestOf::Nine => 9,
        }
    }

    /// Сколько побед нужно, чтобы взять серию: ceil(n / 2).
    pub fn wins_needed(&self) -> u32 {
        (self.count() as u32 + 1) / 2
    }

    /// Серия закончена, если кто-то набрал нужное число побед.
    pub fn is_set_over_by_score(&self, scores: [u32; 2]) -> bool {
        scores.iter().any(|s| *s >= self.wins_needed())
    }

    /// Итоговый счёт серии: победитель набрал ровно `wins_needed`, проигравший меньше.
    pub fn is_final_score(&self, scores: [u32; 2]) -> bool {
        let leader = scores[0].max(scores[1]);
        let trailer = scores[0].min(scores[1]);
        leader == self.wins_needed() && trailer < self.wins_needed()
    }

    /// Сколько карт точно будет сыграно при текущем счёте.
    ///
    /// Лидеру не хватает (wins_needed - max) побед, каждая из них – отдельная карта.
    pub fn maps_played_with_certainty(&self, scores: [u32; 2]) -> u32 {
        let played = scores[0] + scores[1];
        let leader = scores[0].max(scores[1]);
        played + self.wins_needed().saturating_sub(leader)
    }
}

impl TryFrom<u8> for BestOf {
    type Error = InvalidBestOf;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(BestOf::Three),
            5 => Ok(BestOf::Five),
            7 => Ok(BestOf::Seven),
            9 => Ok(BestOf::Nine),
            other => Err(InvalidBestOf(other)),
        }
    }
}

impl From<BestOf> for u8 {
    fn from(value: BestOf) -> Self {
        value.count() as u8
    }
}

impl fmt::Display for BestOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bo{}", self.count())
    }
}
