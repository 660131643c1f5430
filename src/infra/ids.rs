use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{TeamId, TournamentId};

/// Простая генерация ID на основе монотонных счётчиков.
/// Это удобно для локальных тестов, оффчейн-сервисов и т.д.
///
/// В Linera-смартконтракте ID турниров берутся из счётчика в state
/// (`BracketState::next_tournament_id`), а ID матчей выдаёт сама сетка.
#[derive(Debug)]
pub struct IdGenerator {
    tournament_counter: AtomicU64,
    team_counter: AtomicU64,
}

impl IdGenerator {
    /// Создать генератор с начальным значением 1 для всех сущностей.
    pub fn new() -> Self {
        Self::starting_at(1, 1)
    }

    /// Продолжить нумерацию после восстановления из хранилища.
    pub fn starting_at(next_tournament: TournamentId, next_team: TeamId) -> Self {
        Self {
            tournament_counter: AtomicU64::new(next_tournament),
            team_counter: AtomicU64::new(next_team),
        }
    }

    #[inline]
    pub fn next_tournament_id(&self) -> TournamentId {
        self.tournament_counter.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn next_team_id(&self) -> TeamId {
        self.team_counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
