//! Инфраструктурный слой вокруг движка сетки:
//! - генерация ID;
//! - детерминированный RNG и seed-ы;
//! - абстракция хранения (off-chain / тесты);
//! - отчёты в рейтинговую систему;
//! - маппинги между API и domain.

pub mod ids;
pub mod mapping;
pub mod persistence;
pub mod rating;
pub mod rng;
pub mod rng_seed;

pub use ids::*;
pub use mapping::*;
pub use persistence::{InMemoryTournamentStorage, TournamentStorage};
pub use rating::{
    dispatch_rating_reports, CollectingRatingSink, MatchOutcomeReport, RosterResolver,
    SkillRatingSink,
};
pub use rng::*;
pub use rng_seed::RngSeed;
