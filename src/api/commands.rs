use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::tournament::{TeamRegistration, TournamentConfig};
use crate::domain::{
    GameResult, MatchId, ModeShort, PickBanEvent, ScoreDetail, TeamId, TournamentId, UserId,
};
use crate::engine::ProgressionLog;
use crate::infra::mapping::{map_bracket_to_dto, map_tournament_to_dto};
use crate::tournament::TournamentLobby;

use super::dto::CommandResponse;
use super::errors::ApiError;

/// Команда верхнего уровня.
///
/// Эти команды превращаются в операции (`BracketOperation`),
/// которые Linera экспонирует наружу.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Command {
    /// Создать новый турнир с заданным конфигом.
    CreateTournament(CreateTournamentCommand),

    /// Зарегистрировать команду в турнир (до старта).
    RegisterTeam(RegisterTeamCommand),

    /// Отменить регистрацию команды (до старта).
    UnregisterTeam { tournament_id: TournamentId, team_id: TeamId },

    CheckInTeam { tournament_id: TournamentId, team_id: TeamId },

    CheckOutTeam { tournament_id: TournamentId, team_id: TeamId },

    /// Посев: полный порядок отметившихся команд, лучший первым.
    SetSeeding { tournament_id: TournamentId, order: Vec<TeamId> },

    /// Старт турнира:
    /// - статус турнира → Running;
    /// - из отметившихся команд строится сетка.
    StartTournament { tournament_id: TournamentId },

    /// Результат матча.
    ReportResult(ReportResultCommand),

    /// Откат результата матча.
    UndoResult { tournament_id: TournamentId, match_id: MatchId },

    /// Пик или бан карты в матче.
    RecordPickBan(RecordPickBanCommand),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateTournamentCommand {
    pub owner: UserId,
    pub config: TournamentConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterTeamCommand {
    pub tournament_id: TournamentId,
    pub name: String,
    pub member_user_ids: Vec<UserId>,
    #[serde(default)]
    pub prefers_not_to_host: bool,
    #[serde(default)]
    pub mode_preferences: Vec<ModeShort>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportResultCommand {
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub winner_team_id: TeamId,
    /// Счёт по картам; None – результат без счёта.
    pub score: Option<ScoreDetail>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordPickBanCommand {
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub event: PickBanEvent,
    /// Уже сыгранные карты серии.
    #[serde(default)]
    pub results: Vec<GameResult>,
}

/// Выполнить команду над лобби.
pub fn handle_command(lobby: &mut TournamentLobby, command: Command) -> Result<CommandResponse, ApiError> {
    debug!(?command, "handling command");

    match command {
        Command::CreateTournament(cmd) => {
            let tournament_id = lobby.create_tournament(cmd.owner, cmd.config)?;
            Ok(CommandResponse::TournamentCreated { tournament_id })
        }

        Command::RegisterTeam(cmd) => {
            let team_id = lobby.next_team_id();
            let mut registration = TeamRegistration::new(team_id, cmd.name);
            registration.member_user_ids = cmd.member_user_ids;
            registration.prefers_not_to_host = cmd.prefers_not_to_host;
            registration.mode_preferences = cmd.mode_preferences;

            lobby.register_team(cmd.tournament_id, registration)?;
            Ok(CommandResponse::TeamRegistered { team_id })
        }

        Command::UnregisterTeam {
            tournament_id,
            team_id,
        } => {
            lobby.unregister_team(tournament_id, team_id)?;
            Ok(CommandResponse::Ok)
        }

        Command::CheckInTeam {
            tournament_id,
            team_id,
        } => {
            lobby.check_in(tournament_id, team_id)?;
            Ok(CommandResponse::Ok)
        }

        Command::CheckOutTeam {
            tournament_id,
            team_id,
        } => {
            lobby.check_out(tournament_id, team_id)?;
            Ok(CommandResponse::Ok)
        }

        Command::SetSeeding {
            tournament_id,
            order,
        } => {
            lobby.set_seeding(tournament_id, &order)?;
            tournament_response(lobby, tournament_id)
        }

        Command::StartTournament { tournament_id } => {
            lobby.start_tournament(tournament_id)?;
            tournament_response(lobby, tournament_id)
        }

        Command::ReportResult(cmd) => {
            let log = lobby.report_result(
                cmd.tournament_id,
                cmd.match_id,
                cmd.winner_team_id,
                cmd.score,
            )?;
            progression_response(lobby, cmd.tournament_id, log)
        }

        Command::UndoResult {
            tournament_id,
            match_id,
        } => {
            let log = lobby.undo_result(tournament_id, match_id)?;
            progression_response(lobby, tournament_id, log)
        }

        Command::RecordPickBan(cmd) => {
            let maps = lobby.record_pick_ban(cmd.tournament_id, cmd.match_id, cmd.event, &cmd.results)?;
            Ok(CommandResponse::MapList(maps))
        }
    }
}

fn tournament_response(
    lobby: &TournamentLobby,
    tournament_id: TournamentId,
) -> Result<CommandResponse, ApiError> {
    let tournament = lobby.tournament(tournament_id)?;
    Ok(CommandResponse::Tournament(map_tournament_to_dto(tournament)))
}

fn progression_response(
    lobby: &TournamentLobby,
    tournament_id: TournamentId,
    log: ProgressionLog,
) -> Result<CommandResponse, ApiError> {
    let tournament = lobby.tournament(tournament_id)?;
    let bracket = tournament.bracket()?;
    Ok(CommandResponse::Progression {
        bracket: map_bracket_to_dto(tournament_id, bracket, Some(&tournament.config), tournament),
        log,
    })
}
