//! RngSeed – доменный seed для детерминированного RNG.
//!
//! Позволяет:
//!   - получать seed из числа или строки (например, "abc");
//!   - делать seed матча из (tournament_id, match_id), чтобы список карт
//!     пересчитывался одинаково при каждом запросе;
//!   - создавать DeterministicRng из seed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{MatchId, TournamentId};
use crate::infra::rng::DeterministicRng;

const SEED_DOMAIN: &[u8] = b"BRACKET_ENGINE_RNG_V1";

/// 32-байтовый seed для RNG.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Создать seed из 32 байт.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Seed из u64 (для удобства тестов).
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes: b }
    }

    /// Seed из произвольной строки: H(domain || "text" || text).
    pub fn from_text(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update(b"text");
        hasher.update(text.as_bytes());
        Self::from_digest(hasher)
    }

    /// Seed списка карт матча: H(domain || "match" || tournament_id || match_id).
    pub fn for_match(tournament_id: TournamentId, match_id: MatchId) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SEED_DOMAIN);
        hasher.update(b"match");
        hasher.update(tournament_id.to_le_bytes());
        hasher.update(match_id.to_le_bytes());
        Self::from_digest(hasher)
    }

    fn from_digest(hasher: Sha256) -> Self {
        let hash = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash[..32]);
        Self { bytes: out }
    }

    /// Создать DeterministicRng из seed.
    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed(self.bytes)
    }
}

impl From<&str> for RngSeed {
    fn from(text: &str) -> Self {
        RngSeed::from_text(text)
    }
}
