use serde::{Deserialize, Serialize};

use crate::domain::tournament::TournamentStatus;
use crate::domain::{
    BestOf, BracketStatus, BracketType, MatchId, MatchSide, MatchStatus, ScoreDetail, TeamId,
    TournamentId, TournamentMapListMap,
};
use crate::engine::ProgressionLog;

/// DTO участника в слоте матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamSlotDto {
    /// None для BYE.
    pub team_id: Option<TeamId>,
    pub display_name: String,
    pub is_bye: bool,
}

/// DTO матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchViewDto {
    pub match_id: MatchId,
    pub number: u32,
    pub position: u32,
    pub side: MatchSide,
    pub round: u32,
    pub upper: Option<TeamSlotDto>,
    pub lower: Option<TeamSlotDto>,
    pub winner_team_id: Option<TeamId>,
    pub status: MatchStatus,
    pub score: Option<ScoreDetail>,
    pub winner_destination: Option<MatchId>,
    pub loser_destination: Option<MatchId>,
    /// number = 0 – матч не показываем (решён BYE).
    pub hidden: bool,
}

/// DTO раунда: название и длина серии.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundViewDto {
    pub side: MatchSide,
    pub round: u32,
    pub name: String,
    pub best_of: BestOf,
    pub matches: Vec<MatchViewDto>,
}

/// DTO сетки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BracketViewDto {
    pub tournament_id: TournamentId,
    pub bracket_type: BracketType,
    pub status: BracketStatus,
    pub champion_team_id: Option<TeamId>,
    pub participant_count: u32,
    pub participants_with_byes_count: u32,
    pub rounds: Vec<RoundViewDto>,
}

/// DTO команды в турнире.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamViewDto {
    pub team_id: TeamId,
    pub name: String,
    pub checked_in: bool,
    pub seed: Option<u32>,
    pub members: u32,
}

/// Краткая информация о турнире.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TournamentViewDto {
    pub tournament_id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub bracket_type: BracketType,
    pub teams: Vec<TeamViewDto>,
    pub checked_in: u32,
    pub min_teams_to_start: u32,
    pub winner_team_id: Option<TeamId>,
}

/// Всё, что нужно странице матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchDetailsDto {
    pub tournament_id: TournamentId,
    pub round_name: String,
    pub best_of: BestOf,
    pub view: MatchViewDto,
    /// Полный список (включая забаненные карты). Пустой, пока соперники не известны.
    pub map_list: Vec<TournamentMapListMap>,
    /// Что реально играется.
    pub playable_maps: Vec<TournamentMapListMap>,
    pub room_pass: String,
    pub hosting_team_id: Option<TeamId>,
}

/// Ответ на команду.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandResponse {
    /// Команда выполнена, данных нет.
    Ok,

    TournamentCreated { tournament_id: TournamentId },

    TeamRegistered { team_id: TeamId },

    Tournament(TournamentViewDto),

    /// Результат репорта/отката: новая сетка и события.
    Progression {
        bracket: BracketViewDto,
        log: ProgressionLog,
    },

    MapList(Vec<TournamentMapListMap>),
}
