//! Доменная модель турнирной сетки: команды, матчи, сетки, пулы карт,
//! best-of, турниры и их конфигурация.

pub mod best_of;
pub mod bracket;
pub mod map_list;
pub mod map_pool;
pub mod matches;
pub mod team;
pub mod tournament;

// Базовые идентификаторы
pub type TeamId = u64;
pub type MatchId = u64;
pub type TournamentId = u64;
pub type UserId = u64;

/// Идентификатор карты (stage) внутри игры.
pub type StageId = u32;

// Удобные реэкспорты, чтобы в других модулях писать crate::domain::Match и т.п.
pub use best_of::*;
pub use bracket::*;
pub use map_list::*;
pub use map_pool::*;
pub use matches::*;
pub use team::*;
pub use tournament::*;
