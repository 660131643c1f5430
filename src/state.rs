use linera_sdk::views::{linera_views, MapView, RegisterView, RootView, ViewStorageContext};

use crate::domain::tournament::Tournament;
use crate::domain::TournamentId;

/// Глобальное состояние приложения турнирных сеток на Linera.
///
/// Важное:
/// - НЕ вкладываем RegisterView внутрь MapView.
/// - Храним доменные структуры напрямую: Tournament вместе с сеткой
///   и записанными пиками/банами.
#[derive(RootView)]
#[view(context = ViewStorageContext)]
pub struct BracketState {
    /// Турниры.
    ///
    /// Ключ: TournamentId,
    /// Значение: Tournament (из crate::domain::tournament).
    pub tournaments: MapView<TournamentId, Tournament>,

    /// Следующий ID турнира.
    pub next_tournament_id: RegisterView<u64>,

    /// Сколько всего результатов записано (для статистики / мониторинга).
    pub results_reported: RegisterView<u64>,
}
