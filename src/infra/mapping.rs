use crate::api::dto::{
    BracketViewDto, MatchViewDto, RoundViewDto, TeamSlotDto, TeamViewDto, TournamentViewDto,
};
use crate::domain::tournament::{Tournament, TournamentConfig};
use crate::domain::{BestOf, Bracket, Match, MatchSide, TeamId, TeamIdentifier};
use crate::engine::round_name;
use crate::tournament::TournamentRuntime;

/// Утилита: получить отображаемое имя команды.
///
/// В турнире имя берётся из регистрации, но здесь оставляем
/// сигнатуру, которую можно реализовать по-разному.
pub trait TeamNameResolver {
    fn resolve_name(&self, team_id: TeamId) -> String;
}

/// Простая реализация: отображаемое имя = "Team {id}".
pub struct DefaultNameResolver;

impl TeamNameResolver for DefaultNameResolver {
    fn resolve_name(&self, team_id: TeamId) -> String {
        format!("Team {}", team_id)
    }
}

impl TeamNameResolver for Tournament {
    fn resolve_name(&self, team_id: TeamId) -> String {
        self.team(team_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| DefaultNameResolver.resolve_name(team_id))
    }
}

fn map_slot(slot: Option<TeamIdentifier>, names: &impl TeamNameResolver) -> Option<TeamSlotDto> {
    slot.map(|team| match team {
        TeamIdentifier::Team(team_id) => TeamSlotDto {
            team_id: Some(team_id),
            display_name: names.resolve_name(team_id),
            is_bye: false,
        },
        TeamIdentifier::Bye => TeamSlotDto {
            team_id: None,
            display_name: "BYE".to_string(),
            is_bye: true,
        },
    })
}

/// Маппинг Match -> MatchViewDto.
pub fn map_match_to_dto(m: &Match, names: &impl TeamNameResolver) -> MatchViewDto {
    MatchViewDto {
        match_id: m.id,
        number: m.number,
        position: m.position,
        side: m.side,
        round: m.round,
        upper: map_slot(m.upper_team, names),
        lower: map_slot(m.lower_team, names),
        winner_team_id: m.winner.and_then(|w| w.team_id()),
        status: m.status(),
        score: m.score,
        winner_destination: m.winner_destination,
        loser_destination: m.loser_destination,
        hidden: m.number == 0,
    }
}

/// Маппинг Bracket -> BracketViewDto: матчи сгруппированы по раундам,
/// у каждого раунда название и длина серии.
pub fn map_bracket_to_dto(
    tournament_id: u64,
    bracket: &Bracket,
    config: Option<&TournamentConfig>,
    names: &impl TeamNameResolver,
) -> BracketViewDto {
    let mut rounds = Vec::new();

    for side in [MatchSide::Winners, MatchSide::Losers, MatchSide::Finals] {
        let positions = bracket.round_positions(side);
        for round in &positions {
            let matches: Vec<MatchViewDto> = bracket
                .side(side)
                .iter()
                .filter(|m| m.round == *round)
                .map(|m| map_match_to_dto(m, names))
                .collect();

            let best_of: BestOf = match config {
                Some(config) => TournamentRuntime::best_of_for(config, bracket, side, *round),
                None => crate::engine::default_best_of(side, *round, &positions),
            };

            rounds.push(RoundViewDto {
                side,
                round: *round,
                name: round_name(side, *round, &positions),
                best_of,
                matches,
            });
        }
    }

    BracketViewDto {
        tournament_id,
        bracket_type: bracket.bracket_type,
        status: bracket.status(),
        champion_team_id: bracket.champion(),
        participant_count: bracket.participant_count,
        participants_with_byes_count: bracket.participants_with_byes_count,
        rounds,
    }
}

/// Маппинг Tournament -> TournamentViewDto (команды в порядке посева, затем по ID).
pub fn map_tournament_to_dto(tournament: &Tournament) -> TournamentViewDto {
    let mut teams: Vec<TeamViewDto> = tournament
        .teams
        .values()
        .map(|r| TeamViewDto {
            team_id: r.team_id,
            name: r.name.clone(),
            checked_in: r.checked_in,
            seed: r.seed,
            members: r.member_user_ids.len() as u32,
        })
        .collect();
    teams.sort_by_key(|t| (t.seed.is_none(), t.seed, t.team_id));

    TournamentViewDto {
        tournament_id: tournament.id,
        name: tournament.config.name.clone(),
        status: tournament.status,
        bracket_type: tournament.config.bracket_type,
        teams,
        checked_in: tournament.checked_in_count(),
        min_teams_to_start: tournament.config.min_teams_to_start,
        winner_team_id: tournament.winner_team_id,
    }
}
