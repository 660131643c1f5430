use serde::{Deserialize, Serialize};

use crate::domain::tournament::TournamentError;
use crate::domain::{MatchId, TeamId, TournamentId};
use crate::engine::EngineError;
use crate::maplist::MapListError;

/// Ошибки внешнего API (то, что отдаём фронту / клиенту).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Неправильные входные данные (например, битый конфиг).
    BadRequest(String),

    /// Турнир не найден.
    TournamentNotFound(TournamentId),

    /// Команда не зарегистрирована.
    TeamNotRegistered(TeamId),

    /// Матч не найден.
    MatchNotFound(MatchId),

    /// Результат уже записан – нужен откат.
    ResultConflict(MatchId),

    /// Команда не может быть выполнена в текущем состоянии.
    InvalidCommand(String),

    /// Ошибка движка сетки.
    EngineError(String),

    /// Ошибка генератора списков карт.
    MapListError(String),

    /// Внутренняя ошибка сервера.
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => ApiError::BadRequest(msg),
            EngineError::MatchNotFound(match_id) => ApiError::MatchNotFound(match_id),
            EngineError::ResultConflict { match_id } => ApiError::ResultConflict(match_id),
            EngineError::IllegalStateTransition { .. } => ApiError::InvalidCommand(err.to_string()),
            EngineError::Internal(msg) => ApiError::Internal(msg.to_string()),
            other => ApiError::EngineError(other.to_string()),
        }
    }
}

impl From<MapListError> for ApiError {
    fn from(err: MapListError) -> Self {
        ApiError::MapListError(err.to_string())
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        match err {
            TournamentError::TournamentNotFound { tournament_id } => {
                ApiError::TournamentNotFound(tournament_id)
            }
            TournamentError::TeamNotRegistered { team_id, .. } => ApiError::TeamNotRegistered(team_id),
            TournamentError::InvalidConfig(msg) => ApiError::BadRequest(msg),
            TournamentError::Engine(inner) => inner.into(),
            TournamentError::MapList(inner) => inner.into(),
            other => ApiError::InvalidCommand(other.to_string()),
        }
    }
}
