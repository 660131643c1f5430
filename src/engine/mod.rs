//! Движок турнирной сетки: построение, продвижение результатов, откат.
//!
//! Основные операции:
//!   - `build_bracket` – построить сетку SE/DE из посеянных команд
//!   - `report_result` – записать победителя матча и продвинуть команды
//!   - `undo_result` – откатить результат (и все BYE-последствия)
//!   - `round_name` / `default_best_of` – подписи и длины серий по раундам

pub mod builder;
pub mod errors;
pub mod history;
pub mod progression;
pub mod round_names;
pub mod seeding;

pub use builder::build_bracket;
pub use errors::EngineError;
pub use history::{ProgressionEvent, ProgressionEventKind, ProgressionLog};
pub use progression::{report_result, undo_result};
pub use round_names::{default_best_of, round_name};
pub use seeding::{drop_ordering, participants_with_byes, seed_order, DropOrdering};

/// RNG интерфейс для engine и генератора списков карт.
/// Реализация – в infra (обёртка над `rand_chacha`).
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
