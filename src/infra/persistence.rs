use std::collections::HashMap;

use crate::domain::tournament::Tournament;
use crate::domain::TournamentId;

/// Абстракция хранилища турниров (вместе с их сетками).
///
/// В Linera-режиме вместо этого используется `BracketState` и Views,
/// но эта абстракция удобна:
/// - для интеграционных тестов,
/// - для оффчейн-сервисов (например, lobby-сервер).
///
/// Сохранение турнира – одна атомарная запись: сетка со всеми
/// каскадными изменениями матчей пишется целиком.
pub trait TournamentStorage {
    /// Загрузить турнир.
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament>;

    /// Сохранить турнир.
    fn save_tournament(&mut self, tournament: &Tournament);

    /// Удалить турнир. Возвращает true, если он был.
    fn delete_tournament(&mut self, id: TournamentId) -> bool;

    /// ID всех сохранённых турниров по возрастанию.
    fn tournament_ids(&self) -> Vec<TournamentId>;
}

/// Простая in-memory реализация для тестов и локального запуска.
///
/// Хранит JSON-снимки, чтобы реплей проходил через тот же путь
/// сериализации, что и on-chain хранение.
#[derive(Debug, Default)]
pub struct InMemoryTournamentStorage {
    snapshots: HashMap<TournamentId, String>,
}

impl InMemoryTournamentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl TournamentStorage for InMemoryTournamentStorage {
    fn load_tournament(&self, id: TournamentId) -> Option<Tournament> {
        let raw = self.snapshots.get(&id)?;
        match serde_json::from_str(raw) {
            Ok(tournament) => Some(tournament),
            Err(err) => {
                tracing::warn!(tournament_id = id, %err, "corrupted tournament snapshot");
                None
            }
        }
    }

    fn save_tournament(&mut self, tournament: &Tournament) {
        match serde_json::to_string(tournament) {
            Ok(raw) => {
                self.snapshots.insert(tournament.id, raw);
            }
            Err(err) => {
                tracing::warn!(tournament_id = tournament.id, %err, "failed to serialize tournament");
            }
        }
    }

    fn delete_tournament(&mut self, id: TournamentId) -> bool {
        self.snapshots.remove(&id).is_some()
    }

    fn tournament_ids(&self) -> Vec<TournamentId> {
        let mut ids: Vec<TournamentId> = self.snapshots.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
