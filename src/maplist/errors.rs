use thiserror::Error;

use crate::domain::ModeShort;

/// Ошибки генератора списков карт.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapListError {
    #[error("Некорректный запрос списка карт: {0}")]
    Validation(String),

    #[error("Нет ни одного доступного режима")]
    NoModesAvailable,

    #[error("В пуле нет карт для режима {mode}")]
    NoStagesAvailable { mode: ModeShort },
}
