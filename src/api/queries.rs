use serde::{Deserialize, Serialize};

use crate::domain::tournament::Tournament;
use crate::domain::{MatchId, TournamentId};
use crate::engine::{round_name, EngineError};
use crate::infra::mapping::{map_bracket_to_dto, map_match_to_dto, map_tournament_to_dto};
use crate::maplist::playable_maps;
use crate::tournament::{resolve_room_pass, TournamentLobby, TournamentRuntime};

use super::dto::{BracketViewDto, MatchDetailsDto, TournamentViewDto};
use super::errors::ApiError;

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Получить минимальную инфу о турнире.
    GetTournament { tournament_id: TournamentId },

    /// Сетка турнира целиком.
    GetBracket { tournament_id: TournamentId },

    /// Страница матча: раунд, серия, карты, хост.
    GetMatch {
        tournament_id: TournamentId,
        match_id: MatchId,
    },

    /// Список турниров (для лобби).
    ListTournaments,
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum QueryResponse {
    Tournament(TournamentViewDto),
    Bracket(BracketViewDto),
    Match(Box<MatchDetailsDto>),
    Tournaments(Vec<TournamentViewDto>),
}

/// Выполнить запрос к лобби.
pub fn handle_query(lobby: &TournamentLobby, query: Query) -> Result<QueryResponse, ApiError> {
    match query {
        Query::GetTournament { tournament_id } => {
            let tournament = lobby.tournament(tournament_id)?;
            Ok(QueryResponse::Tournament(map_tournament_to_dto(tournament)))
        }

        Query::GetBracket { tournament_id } => {
            let tournament = lobby.tournament(tournament_id)?;
            let bracket = tournament.bracket()?;
            Ok(QueryResponse::Bracket(map_bracket_to_dto(
                tournament_id,
                bracket,
                Some(&tournament.config),
                tournament,
            )))
        }

        Query::GetMatch {
            tournament_id,
            match_id,
        } => {
            let tournament = lobby.tournament(tournament_id)?;
            let details = build_match_details(tournament, match_id)?;
            Ok(QueryResponse::Match(Box::new(details)))
        }

        Query::ListTournaments => Ok(QueryResponse::Tournaments(
            lobby.all().map(|(_, t)| map_tournament_to_dto(t)).collect(),
        )),
    }
}

/// Собрать DTO страницы матча.
///
/// Пока соперники не известны, список карт пустой и хост не определён.
pub fn build_match_details(tournament: &Tournament, match_id: MatchId) -> Result<MatchDetailsDto, ApiError> {
    let bracket = tournament.bracket()?;
    let m = bracket
        .get(match_id)
        .ok_or(EngineError::MatchNotFound(match_id))?;

    let positions = bracket.round_positions(m.side);
    let best_of = TournamentRuntime::best_of_for(&tournament.config, bracket, m.side, m.round);

    let ready = TournamentRuntime::match_teams(tournament, match_id).is_ok();
    let (map_list, hosting_team_id) = if ready {
        (
            TournamentRuntime::map_list_for_match(tournament, match_id)?,
            Some(TournamentRuntime::hosting_team(tournament, match_id)?),
        )
    } else {
        (Vec::new(), None)
    };

    Ok(MatchDetailsDto {
        tournament_id: tournament.id,
        round_name: round_name(m.side, m.round, &positions),
        best_of,
        view: map_match_to_dto(m, tournament),
        playable_maps: playable_maps(&map_list),
        map_list,
        room_pass: resolve_room_pass(match_id),
        hosting_team_id,
    })
}
