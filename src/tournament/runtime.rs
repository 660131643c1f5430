// src/tournament/runtime.rs

use tracing::info;

use crate::domain::tournament::{Tournament, TournamentConfig, TournamentError, TournamentStatus};
use crate::domain::{
    BestOf, Bracket, GameResult, MatchId, MatchSide, PickBanEvent, ScoreDetail, TeamId,
    TeamIdentifier, TournamentMapListMap,
};
use crate::engine::{self, default_best_of, EngineError, ProgressionLog};
use crate::infra::rng_seed::RngSeed;
use crate::maplist::{check_pick_ban, generate_map_list, MapListRequest, PickBanContext};
use crate::tournament::hosting::resolve_hosting_team;

/// Рантайм-слой турнира поверх движка сетки:
/// - старт (построение сетки из отметившихся команд);
/// - репорт/откат результатов с синхронизацией статуса турнира;
/// - списки карт, пики/баны и хост для конкретного матча.
pub struct TournamentRuntime;

impl TournamentRuntime {
    /// Запустить турнир: сетка из отметившихся команд в порядке посева.
    pub fn start(tournament: &mut Tournament) -> Result<(), TournamentError> {
        if tournament.status != TournamentStatus::Registering {
            return Err(TournamentError::InvalidStatus {
                expected: TournamentStatus::Registering,
                found: tournament.status,
            });
        }

        let checked_in = tournament.checked_in_count();
        if checked_in < tournament.config.min_teams_to_start {
            return Err(TournamentError::NotEnoughTeams {
                checked_in,
                required: tournament.config.min_teams_to_start,
            });
        }

        let seeds = tournament.seeded_team_ids();
        let bracket = engine::build_bracket(
            seeds.len() as u32,
            tournament.config.bracket_type,
            &seeds,
        )?;

        info!(
            tournament_id = tournament.id,
            teams = seeds.len(),
            matches = bracket.match_count(),
            "tournament started"
        );

        tournament.bracket = Some(bracket);
        tournament.status = TournamentStatus::Running;
        Ok(())
    }

    /// Длина серии для раунда: ручная настройка или значение по умолчанию.
    pub fn best_of_for(
        config: &TournamentConfig,
        bracket: &Bracket,
        side: MatchSide,
        round: u32,
    ) -> BestOf {
        config
            .best_of_override(side, round)
            .unwrap_or_else(|| default_best_of(side, round, &bracket.round_positions(side)))
    }

    /// Длина серии конкретного матча.
    pub fn best_of_for_match(tournament: &Tournament, match_id: MatchId) -> Result<BestOf, TournamentError> {
        let bracket = tournament.bracket()?;
        let m = bracket
            .get(match_id)
            .ok_or(EngineError::MatchNotFound(match_id))?;
        Ok(Self::best_of_for(&tournament.config, bracket, m.side, m.round))
    }

    /// Записать результат матча.
    ///
    /// Если передан счёт, он должен быть итоговым для серии этого раунда.
    pub fn report_result(
        tournament: &mut Tournament,
        match_id: MatchId,
        winner: TeamId,
        score: Option<ScoreDetail>,
    ) -> Result<ProgressionLog, TournamentError> {
        if let Some(score) = score {
            let best_of = Self::best_of_for_match(tournament, match_id)?;
            if !best_of.is_final_score([score.upper, score.lower]) {
                return Err(TournamentError::ScoreDoesNotFinishSet { match_id, best_of });
            }
        }

        let tournament_id = tournament.id;
        let bracket = tournament
            .bracket
            .as_mut()
            .ok_or(TournamentError::BracketNotStarted { tournament_id })?;

        let log = engine::report_result(bracket, match_id, TeamIdentifier::Team(winner), score)?;
        Self::sync_status(tournament);
        Ok(log)
    }

    /// Откатить результат матча.
    pub fn undo_result(
        tournament: &mut Tournament,
        match_id: MatchId,
    ) -> Result<ProgressionLog, TournamentError> {
        let tournament_id = tournament.id;
        let bracket = tournament
            .bracket
            .as_mut()
            .ok_or(TournamentError::BracketNotStarted { tournament_id })?;

        let log = engine::undo_result(bracket, match_id)?;
        Self::sync_status(tournament);
        Ok(log)
    }

    /// Статус турнира следует за статусом сетки (в обе стороны – с учётом отката).
    fn sync_status(tournament: &mut Tournament) {
        let champion = tournament.bracket.as_ref().and_then(Bracket::champion);
        match champion {
            Some(team_id) => {
                if tournament.status != TournamentStatus::Finished {
                    info!(tournament_id = tournament.id, champion = team_id, "tournament finished");
                }
                tournament.status = TournamentStatus::Finished;
                tournament.winner_team_id = Some(team_id);
            }
            None => {
                tournament.status = TournamentStatus::Running;
                tournament.winner_team_id = None;
            }
        }
    }

    /// Обе команды матча (верхний слот, нижний слот).
    pub fn match_teams(tournament: &Tournament, match_id: MatchId) -> Result<[TeamId; 2], TournamentError> {
        let bracket = tournament.bracket()?;
        let m = bracket
            .get(match_id)
            .ok_or(EngineError::MatchNotFound(match_id))?;

        match (
            m.upper_team.and_then(|t| t.team_id()),
            m.lower_team.and_then(|t| t.team_id()),
        ) {
            (Some(upper), Some(lower)) => Ok([upper, lower]),
            _ => Err(TournamentError::MatchNotReady { match_id }),
        }
    }

    /// Запрос к генератору для матча. Seed = (tournament_id, match_id).
    pub fn map_list_request(
        tournament: &Tournament,
        match_id: MatchId,
    ) -> Result<MapListRequest, TournamentError> {
        let teams = Self::match_teams(tournament, match_id)?;
        let best_of = Self::best_of_for_match(tournament, match_id)?;
        let config = &tournament.config;

        let mut request = MapListRequest::new(
            RngSeed::for_match(tournament.id, match_id),
            best_of,
            config.modes_included(),
            config.map_pool.clone(),
        )
        .with_tiebreakers(config.effective_tiebreaker_maps());

        let preferences = teams.map(|team_id| {
            tournament
                .team(team_id)
                .map(|r| r.mode_preferences.clone())
                .unwrap_or_default()
        });
        if preferences.iter().all(|p| !p.is_empty()) {
            let [first, second] = preferences;
            request = request.with_team_preferences(first, second);
        }

        if let Some(style) = config.pick_ban {
            request = request.with_pick_ban(style, tournament.events_for_match(match_id).to_vec());
        }

        Ok(request)
    }

    /// Список карт матча (с учётом уже сделанных пиков/банов).
    pub fn map_list_for_match(
        tournament: &Tournament,
        match_id: MatchId,
    ) -> Result<Vec<TournamentMapListMap>, TournamentError> {
        let request = Self::map_list_request(tournament, match_id)?;
        Ok(generate_map_list(&request)?)
    }

    /// Записать пик/бан, если он легален. Возвращает обновлённый список карт.
    ///
    /// `results` – уже сыгранные карты серии (их хранит внешний слой).
    pub fn record_pick_ban(
        tournament: &mut Tournament,
        match_id: MatchId,
        event: PickBanEvent,
        results: &[GameResult],
    ) -> Result<Vec<TournamentMapListMap>, TournamentError> {
        let style = tournament
            .config
            .pick_ban
            .ok_or_else(|| TournamentError::IllegalPickBan("tournament has no pick/ban".into()))?;

        let decided = tournament
            .bracket()?
            .get(match_id)
            .map_or(false, |m| m.is_decided());
        if decided {
            return Err(TournamentError::IllegalPickBan(format!(
                "match {match_id} is already decided"
            )));
        }

        let teams = Self::match_teams(tournament, match_id)?;
        let best_of = Self::best_of_for_match(tournament, match_id)?;
        let current = Self::map_list_for_match(tournament, match_id)?;

        let ctx = PickBanContext {
            style,
            teams,
            best_of,
            results,
            map_list: &current,
            pool: &tournament.config.map_pool,
        };
        check_pick_ban(&ctx, &event).map_err(TournamentError::IllegalPickBan)?;

        tournament
            .pick_ban_events
            .entry(match_id)
            .or_default()
            .push(event);

        Self::map_list_for_match(tournament, match_id)
    }

    /// Какая команда создаёт комнату матча.
    pub fn hosting_team(tournament: &Tournament, match_id: MatchId) -> Result<TeamId, TournamentError> {
        let [upper, lower] = Self::match_teams(tournament, match_id)?;
        let tournament_id = tournament.id;
        let registration = |team_id: TeamId| {
            tournament
                .team(team_id)
                .ok_or(TournamentError::TeamNotRegistered {
                    team_id,
                    tournament_id,
                })
        };
        Ok(resolve_hosting_team([registration(upper)?, registration(lower)?]))
    }
}
