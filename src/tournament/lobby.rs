// src/tournament/lobby.rs

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::tournament::{TeamRegistration, Tournament, TournamentConfig, TournamentError};
use crate::domain::{
    GameResult, MatchId, PickBanEvent, ScoreDetail, TeamId, TournamentId, TournamentMapListMap, UserId,
};
use crate::engine::ProgressionLog;
use crate::infra::ids::IdGenerator;
use crate::infra::persistence::TournamentStorage;
use crate::infra::rating::{dispatch_rating_reports, SkillRatingSink};
use crate::tournament::runtime::TournamentRuntime;

/// Турнирное лобби:
/// - хранит турниры в памяти;
/// - выдаёт новые TournamentId / TeamId;
/// - ведёт регистрацию, чек-ин и посев;
/// - прокидывает результаты в рантайм и отчёты в рейтинговую систему.
///
/// Один писатель на лобби: конкурентный доступ – через внешний lock.
pub struct TournamentLobby {
    tournaments: BTreeMap<TournamentId, Tournament>,
    ids: IdGenerator,
    rating_sink: Option<Box<dyn SkillRatingSink + Send>>,
}

impl TournamentLobby {
    /// Пустое лобби, без турниров.
    pub fn new() -> Self {
        Self {
            tournaments: BTreeMap::new(),
            ids: IdGenerator::new(),
            rating_sink: None,
        }
    }

    /// Подключить рейтинговую систему.
    pub fn set_rating_sink(&mut self, sink: Box<dyn SkillRatingSink + Send>) {
        self.rating_sink = Some(sink);
    }

    /// Создать новый турнир. Конфиг валидируется целиком.
    pub fn create_tournament(
        &mut self,
        owner: UserId,
        config: TournamentConfig,
    ) -> Result<TournamentId, TournamentError> {
        let id = self.ids.next_tournament_id();
        let tournament = Tournament::new(id, owner, config)?;

        debug!(tournament_id = id, "tournament created");
        self.tournaments.insert(id, tournament);
        Ok(id)
    }

    /// Получить турнир по id (только чтение).
    pub fn get(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.get(&id)
    }

    /// Получить турнир по id (для изменения).
    pub fn get_mut(&mut self, id: TournamentId) -> Option<&mut Tournament> {
        self.tournaments.get_mut(&id)
    }

    pub fn tournament(&self, tournament_id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&tournament_id)
            .ok_or(TournamentError::TournamentNotFound { tournament_id })
    }

    fn tournament_mut(&mut self, tournament_id: TournamentId) -> Result<&mut Tournament, TournamentError> {
        self.tournaments
            .get_mut(&tournament_id)
            .ok_or(TournamentError::TournamentNotFound { tournament_id })
    }

    /// Вернуть все турниры (например, для отображения в фронте).
    pub fn all(&self) -> impl Iterator<Item = (&TournamentId, &Tournament)> {
        self.tournaments.iter()
    }

    /// Новый ID команды.
    pub fn next_team_id(&self) -> TeamId {
        self.ids.next_team_id()
    }

    /// Зарегистрировать команду в турнир.
    pub fn register_team(
        &mut self,
        tournament_id: TournamentId,
        registration: TeamRegistration,
    ) -> Result<(), TournamentError> {
        self.tournament_mut(tournament_id)?.register_team(registration)
    }

    pub fn unregister_team(
        &mut self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> Result<(), TournamentError> {
        self.tournament_mut(tournament_id)?
            .unregister_team(team_id)
            .map(|_| ())
    }

    pub fn check_in(&mut self, tournament_id: TournamentId, team_id: TeamId) -> Result<(), TournamentError> {
        self.tournament_mut(tournament_id)?.check_in(team_id)
    }

    pub fn check_out(&mut self, tournament_id: TournamentId, team_id: TeamId) -> Result<(), TournamentError> {
        self.tournament_mut(tournament_id)?.check_out(team_id)
    }

    pub fn set_seeding(&mut self, tournament_id: TournamentId, order: &[TeamId]) -> Result<(), TournamentError> {
        self.tournament_mut(tournament_id)?.set_seeding(order)
    }

    /// Старт турнира: строится сетка.
    pub fn start_tournament(&mut self, tournament_id: TournamentId) -> Result<(), TournamentError> {
        TournamentRuntime::start(self.tournament_mut(tournament_id)?)
    }

    /// Записать результат и отправить отчёты в рейтинговую систему.
    ///
    /// Ошибки рейтинговой системы не влияют на результат.
    pub fn report_result(
        &mut self,
        tournament_id: TournamentId,
        match_id: MatchId,
        winner: TeamId,
        score: Option<ScoreDetail>,
    ) -> Result<ProgressionLog, TournamentError> {
        let tournament = self
            .tournaments
            .get_mut(&tournament_id)
            .ok_or(TournamentError::TournamentNotFound { tournament_id })?;

        let log = TournamentRuntime::report_result(tournament, match_id, winner, score)?;

        if let Some(sink) = self.rating_sink.as_mut() {
            let rosters = |team_id: TeamId| tournament.roster(team_id);
            dispatch_rating_reports(&log, &rosters, &mut **sink);
        }

        Ok(log)
    }

    pub fn undo_result(
        &mut self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> Result<ProgressionLog, TournamentError> {
        TournamentRuntime::undo_result(self.tournament_mut(tournament_id)?, match_id)
    }

    pub fn map_list(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> Result<Vec<TournamentMapListMap>, TournamentError> {
        TournamentRuntime::map_list_for_match(self.tournament(tournament_id)?, match_id)
    }

    pub fn record_pick_ban(
        &mut self,
        tournament_id: TournamentId,
        match_id: MatchId,
        event: PickBanEvent,
        results: &[GameResult],
    ) -> Result<Vec<TournamentMapListMap>, TournamentError> {
        TournamentRuntime::record_pick_ban(self.tournament_mut(tournament_id)?, match_id, event, results)
    }

    /// Сохранить все турниры в хранилище.
    pub fn persist(&self, storage: &mut dyn TournamentStorage) {
        for tournament in self.tournaments.values() {
            storage.save_tournament(tournament);
        }
    }

    /// Восстановить лобби из хранилища. Нумерация продолжается после
    /// максимальных сохранённых ID.
    pub fn restore(storage: &dyn TournamentStorage) -> Self {
        let tournaments: BTreeMap<TournamentId, Tournament> = storage
            .tournament_ids()
            .into_iter()
            .filter_map(|id| storage.load_tournament(id))
            .map(|t| (t.id, t))
            .collect();

        let next_tournament = tournaments.keys().max().copied().unwrap_or(0) + 1;
        let next_team = tournaments
            .values()
            .flat_map(|t| t.teams.keys().copied())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            tournaments,
            ids: IdGenerator::starting_at(next_tournament, next_team),
            rating_sink: None,
        }
    }
}

impl Default for TournamentLobby {
    fn default() -> Self {
        Self::new()
    }
}
