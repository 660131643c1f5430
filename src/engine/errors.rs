use crate::domain::{BracketType, MatchId};

use thiserror::Error;

/// Ошибки движка сетки.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Некорректные входные данные: {0}")]
    Validation(String),

    #[error("Формат сетки {0} не поддерживается")]
    UnsupportedBracketType(BracketType),

    #[error("Матч {0} не найден в сетке")]
    MatchNotFound(MatchId),

    #[error("Матч {match_id} уже решён с другим победителем")]
    ResultConflict { match_id: MatchId },

    #[error("Недопустимый переход для матча {match_id}: {reason}")]
    IllegalStateTransition {
        match_id: MatchId,
        reason: &'static str,
    },

    #[error("Внутренняя ошибка: {0}")]
    Internal(&'static str),
}
