// src/domain/tournament.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::best_of::BestOf;
use crate::domain::bracket::{Bracket, BracketType};
use crate::domain::map_list::{MapPickingStyle, PickBanEvent, PickBanStyle};
use crate::domain::map_pool::{MapPool, ModeShort, ModeWithStage};
use crate::domain::matches::MatchSide;
use crate::domain::{MatchId, TeamId, TournamentId, UserId};
use crate::engine::EngineError;
use crate::maplist::MapListError;

/// Переопределение длины серии для конкретного раунда.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundBestOf {
    pub side: MatchSide,
    /// Номер раунда внутри стороны, с 1.
    pub round: u32,
    pub best_of: BestOf,
}

/// Конфигурация турнира.
/// Всё, что приходит при создании турнира через фронт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentConfig {
    /// Название турнира.
    pub name: String,

    /// Краткое описание.
    pub description: Option<String>,

    /// Формат сетки (SE / DE).
    pub bracket_type: BracketType,

    /// Максимальное количество команд (cap).
    pub max_teams: u32,

    /// Минимальное количество отметившихся команд для старта.
    pub min_teams_to_start: u32,

    /// Какие режимы идут в автогенерацию списков карт.
    pub map_picking_style: MapPickingStyle,

    /// Пул карт организатора.
    pub map_pool: MapPool,

    /// Пул тайбрейкеров (используется только для AUTO_ALL).
    pub tiebreaker_maps: Vec<ModeWithStage>,

    /// Пики/баны. None = список целиком от генератора.
    pub pick_ban: Option<PickBanStyle>,

    /// Ручные best-of по раундам. Остальные раунды – по умолчанию.
    pub best_of_overrides: Vec<RoundBestOf>,
}

impl TournamentConfig {
    /// Жёсткая валидация конфига турнира.
    pub fn validate_full(&self) -> Result<(), TournamentError> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: name is empty".into(),
            ));
        }

        if self.max_teams == 0 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: max_teams = 0".into(),
            ));
        }

        if self.min_teams_to_start < 2 {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: min_teams_to_start must be at least 2".into(),
            ));
        }

        if self.min_teams_to_start > self.max_teams {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: min_teams_to_start > max_teams".into(),
            ));
        }

        if !self.bracket_type.is_elimination() {
            return Err(TournamentError::UnsupportedFormat {
                bracket_type: self.bracket_type,
            });
        }

        for mode in self.modes_included() {
            if self.map_pool.stages_for(mode).is_empty() {
                return Err(TournamentError::InvalidConfig(format!(
                    "TournamentConfig: map pool has no stages for mode {mode}"
                )));
            }
        }

        let unique: BTreeSet<&ModeWithStage> = self.tiebreaker_maps.iter().collect();
        if unique.len() != self.tiebreaker_maps.len() {
            return Err(TournamentError::InvalidConfig(
                "TournamentConfig: duplicated tiebreaker maps".into(),
            ));
        }

        let mut seen_rounds = BTreeSet::new();
        for ov in &self.best_of_overrides {
            if ov.round == 0 {
                return Err(TournamentError::InvalidConfig(
                    "TournamentConfig: best_of override for round 0".into(),
                ));
            }
            if !seen_rounds.insert((ov.side, ov.round)) {
                return Err(TournamentError::InvalidConfig(format!(
                    "TournamentConfig: duplicated best_of override for {} round {}",
                    ov.side, ov.round
                )));
            }
        }

        Ok(())
    }

    pub fn modes_included(&self) -> Vec<ModeShort> {
        self.map_picking_style.modes_included()
    }

    /// Тайбрейкеры с учётом стиля: для одиночного режима их нет.
    pub fn effective_tiebreaker_maps(&self) -> Vec<ModeWithStage> {
        if self.map_picking_style.uses_tiebreaker() {
            self.tiebreaker_maps.clone()
        } else {
            Vec::new()
        }
    }

    pub fn best_of_override(&self, side: MatchSide, round: u32) -> Option<BestOf> {
        self.best_of_overrides
            .iter()
            .find(|ov| ov.side == side && ov.round == round)
            .map(|ov| ov.best_of)
    }
}

/// Статус турнира.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TournamentStatus {
    Registering,
    Running,
    Finished,
}

/// Команда в турнире (регистрация).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRegistration {
    pub team_id: TeamId,
    pub name: String,
    /// Игроки состава (нужны рейтинговой системе).
    pub member_user_ids: Vec<UserId>,
    /// Отметилась ли команда перед стартом.
    pub checked_in: bool,
    /// Посев (1 = сильнейший). None = после всех посеянных.
    pub seed: Option<u32>,
    /// Команда просит не хостить лобби.
    pub prefers_not_to_host: bool,
    /// Любимые режимы (для выбора общих режимов в списке карт).
    pub mode_preferences: Vec<ModeShort>,
}

impl TeamRegistration {
    pub fn new(team_id: TeamId, name: impl Into<String>) -> Self {
        Self {
            team_id,
            name: name.into(),
            member_user_ids: Vec::new(),
            checked_in: false,
            seed: None,
            prefers_not_to_host: false,
            mode_preferences: Vec::new(),
        }
    }
}

/// Основной объект турнира.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tournament {
    pub id: TournamentId,
    pub owner: UserId,
    pub config: TournamentConfig,
    pub status: TournamentStatus,
    pub teams: BTreeMap<TeamId, TeamRegistration>,

    /// Сетка появляется при старте турнира.
    pub bracket: Option<Bracket>,

    /// Пики/баны по матчам.
    pub pick_ban_events: BTreeMap<MatchId, Vec<PickBanEvent>>,

    /// Победитель турнира (если уже известен).
    pub winner_team_id: Option<TeamId>,
}

impl Tournament {
    pub fn new(
        id: TournamentId,
        owner: UserId,
        config: TournamentConfig,
    ) -> Result<Self, TournamentError> {
        config.validate_full()?;

        Ok(Self {
            id,
            owner,
            config,
            status: TournamentStatus::Registering,
            teams: BTreeMap::new(),
            bracket: None,
            pick_ban_events: BTreeMap::new(),
            winner_team_id: None,
        })
    }

    fn ensure_status(&self, expected: TournamentStatus) -> Result<(), TournamentError> {
        if self.status != expected {
            return Err(TournamentError::InvalidStatus {
                expected,
                found: self.status,
            });
        }
        Ok(())
    }

    /// Регистрируем команду (пока турнир в статусе Registering).
    pub fn register_team(&mut self, registration: TeamRegistration) -> Result<(), TournamentError> {
        self.ensure_status(TournamentStatus::Registering)?;

        if registration.name.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "TeamRegistration: name is empty".into(),
            ));
        }

        if self.teams.len() as u32 >= self.config.max_teams {
            return Err(TournamentError::TournamentFull {
                tournament_id: self.id,
            });
        }

        if self.teams.contains_key(&registration.team_id) {
            return Err(TournamentError::TeamAlreadyRegistered {
                team_id: registration.team_id,
                tournament_id: self.id,
            });
        }

        let mut registration = registration;
        registration.checked_in = false;
        registration.seed = None;
        self.teams.insert(registration.team_id, registration);
        Ok(())
    }

    pub fn unregister_team(&mut self, team_id: TeamId) -> Result<TeamRegistration, TournamentError> {
        self.ensure_status(TournamentStatus::Registering)?;
        self.teams
            .remove(&team_id)
            .ok_or(TournamentError::TeamNotRegistered {
                team_id,
                tournament_id: self.id,
            })
    }

    fn registration_mut(&mut self, team_id: TeamId) -> Result<&mut TeamRegistration, TournamentError> {
        let tournament_id = self.id;
        self.teams
            .get_mut(&team_id)
            .ok_or(TournamentError::TeamNotRegistered {
                team_id,
                tournament_id,
            })
    }

    pub fn check_in(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        self.ensure_status(TournamentStatus::Registering)?;
        self.registration_mut(team_id)?.checked_in = true;
        Ok(())
    }

    pub fn check_out(&mut self, team_id: TeamId) -> Result<(), TournamentError> {
        self.ensure_status(TournamentStatus::Registering)?;
        self.registration_mut(team_id)?.checked_in = false;
        Ok(())
    }

    /// Задать посев: `order[0]` получает seed 1 и т.д.
    /// Команды вне списка остаются без посева.
    pub fn set_seeding(&mut self, order: &[TeamId]) -> Result<(), TournamentError> {
        self.ensure_status(TournamentStatus::Registering)?;

        let mut seen = BTreeSet::new();
        for team_id in order {
            if !self.teams.contains_key(team_id) {
                return Err(TournamentError::TeamNotRegistered {
                    team_id: *team_id,
                    tournament_id: self.id,
                });
            }
            if !seen.insert(*team_id) {
                return Err(TournamentError::InvalidSeeding(format!(
                    "team {team_id} appears twice in seeding"
                )));
            }
        }

        for reg in self.teams.values_mut() {
            reg.seed = None;
        }
        for (idx, team_id) in order.iter().enumerate() {
            if let Some(reg) = self.teams.get_mut(team_id) {
                reg.seed = Some(idx as u32 + 1);
            }
        }
        Ok(())
    }

    pub fn team(&self, team_id: TeamId) -> Option<&TeamRegistration> {
        self.teams.get(&team_id)
    }

    pub fn checked_in_teams(&self) -> impl Iterator<Item = &TeamRegistration> {
        self.teams.values().filter(|r| r.checked_in)
    }

    pub fn checked_in_count(&self) -> u32 {
        self.checked_in_teams().count() as u32
    }

    /// Отметившиеся команды в порядке посева (лучшие первыми).
    ///
    /// Без посева – после посеянных, по возрастанию ID.
    pub fn seeded_team_ids(&self) -> Vec<TeamId> {
        let mut teams: Vec<&TeamRegistration> = self.checked_in_teams().collect();
        teams.sort_by_key(|r| (r.seed.is_none(), r.seed, r.team_id));
        teams.into_iter().map(|r| r.team_id).collect()
    }

    /// Можно ли стартовать турнир.
    pub fn can_start(&self) -> bool {
        self.status == TournamentStatus::Registering
            && self.checked_in_count() >= self.config.min_teams_to_start
    }

    /// Состав команды (пусто, если команда неизвестна).
    pub fn roster(&self, team_id: TeamId) -> Vec<UserId> {
        self.teams
            .get(&team_id)
            .map(|r| r.member_user_ids.clone())
            .unwrap_or_default()
    }

    pub fn bracket(&self) -> Result<&Bracket, TournamentError> {
        self.bracket
            .as_ref()
            .ok_or(TournamentError::BracketNotStarted {
                tournament_id: self.id,
            })
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }

    pub fn events_for_match(&self, match_id: MatchId) -> &[PickBanEvent] {
        self.pick_ban_events
            .get(&match_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Ошибки, которые могут возникать при работе с турниром.
#[derive(Debug, Error, Clone)]
pub enum TournamentError {
    #[error("Invalid tournament config: {0}")]
    InvalidConfig(String),

    #[error("Bracket type {bracket_type} is not supported")]
    UnsupportedFormat { bracket_type: BracketType },

    #[error("Tournament not found: id={tournament_id}")]
    TournamentNotFound { tournament_id: TournamentId },

    #[error("Tournament is full: id={tournament_id}")]
    TournamentFull { tournament_id: TournamentId },

    #[error("Team {team_id} is already registered in tournament {tournament_id}")]
    TeamAlreadyRegistered {
        team_id: TeamId,
        tournament_id: TournamentId,
    },

    #[error("Team {team_id} is not registered in tournament {tournament_id}")]
    TeamNotRegistered {
        team_id: TeamId,
        tournament_id: TournamentId,
    },

    #[error("Invalid tournament status: expected {expected:?}, found {found:?}")]
    InvalidStatus {
        expected: TournamentStatus,
        found: TournamentStatus,
    },

    #[error("Not enough checked-in teams: {checked_in} < {required}")]
    NotEnoughTeams { checked_in: u32, required: u32 },

    #[error("Invalid seeding: {0}")]
    InvalidSeeding(String),

    #[error("Bracket of tournament {tournament_id} has not been started")]
    BracketNotStarted { tournament_id: TournamentId },

    #[error("Match {match_id} does not have two known teams yet")]
    MatchNotReady { match_id: MatchId },

    #[error("Score does not finish a {best_of} set in match {match_id}")]
    ScoreDoesNotFinishSet { match_id: MatchId, best_of: BestOf },

    #[error("Illegal pick/ban: {0}")]
    IllegalPickBan(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    MapList(#[from] MapListError),
}
