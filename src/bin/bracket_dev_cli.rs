// src/bin/bracket_dev_cli.rs
//
// Прогон турнира в памяти: регистрация, чек-ин, сетка, результаты до чемпиона.
//
//   bracket_dev_cli [TEAMS] [SE|DE] [CONFIG.json]

use std::env;
use std::fs;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bracket_engine::api::{
    handle_command, handle_query, Command, CreateTournamentCommand, QueryResponse,
    RegisterTeamCommand, ReportResultCommand,
};
use bracket_engine::api::Query;
use bracket_engine::domain::tournament::TournamentConfig;
use bracket_engine::domain::{
    BracketType, MapPickingStyle, MapPool, MatchStatus, ModeShort, ModeWithStage, ScoreDetail,
    TeamIdentifier,
};
use bracket_engine::infra::RngSeed;
use bracket_engine::tournament::{TournamentLobby, TournamentRuntime};

fn default_config(bracket_type: BracketType, max_teams: u32) -> TournamentConfig {
    let map_pool = MapPool::new()
        .with_mode(ModeShort::SZ, &[1, 2, 3, 4])
        .with_mode(ModeShort::TC, &[5, 6, 7])
        .with_mode(ModeShort::RM, &[8, 9, 10])
        .with_mode(ModeShort::CB, &[11, 12, 13]);

    TournamentConfig {
        name: "Dev Cup".to_string(),
        description: None,
        bracket_type,
        max_teams,
        min_teams_to_start: 2,
        map_picking_style: MapPickingStyle::AutoAll,
        map_pool,
        tiebreaker_maps: vec![
            ModeWithStage::new(ModeShort::SZ, 1),
            ModeWithStage::new(ModeShort::TC, 5),
        ],
        pick_ban: None,
        best_of_overrides: Vec::new(),
    }
}

fn load_config(path: &str) -> Result<TournamentConfig, String> {
    let raw = fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("invalid config {path}: {e}"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let team_count: u32 = args.first().and_then(|s| s.parse().ok()).unwrap_or(8);
    let bracket_type = args
        .get(1)
        .and_then(|s| BracketType::from_code(s))
        .unwrap_or(BracketType::DoubleElimination);

    let config = match args.get(2) {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, "config rejected");
                return;
            }
        },
        None => default_config(bracket_type, team_count.max(2)),
    };

    if let Err(err) = run(config, team_count) {
        error!(?err, "simulation failed");
    }
}

fn run(config: TournamentConfig, team_count: u32) -> Result<(), bracket_engine::api::ApiError> {
    let mut lobby = TournamentLobby::new();

    let tournament_id = match handle_command(
        &mut lobby,
        Command::CreateTournament(CreateTournamentCommand { owner: 1, config }),
    )? {
        bracket_engine::api::CommandResponse::TournamentCreated { tournament_id } => tournament_id,
        other => {
            error!(?other, "unexpected response");
            return Ok(());
        }
    };

    println!("=== BRACKET DEV CLI ===\n");
    println!("Турнир id={tournament_id}, команд: {team_count}\n");

    for i in 1..=team_count {
        let response = handle_command(
            &mut lobby,
            Command::RegisterTeam(RegisterTeamCommand {
                tournament_id,
                name: format!("Team {i}"),
                member_user_ids: vec![u64::from(i) * 10, u64::from(i) * 10 + 1],
                prefers_not_to_host: i % 3 == 0,
                mode_preferences: Vec::new(),
            }),
        )?;
        if let bracket_engine::api::CommandResponse::TeamRegistered { team_id } = response {
            handle_command(&mut lobby, Command::CheckInTeam { tournament_id, team_id })?;
        }
    }

    handle_command(&mut lobby, Command::StartTournament { tournament_id })?;

    // Победитель каждого матча выбирается детерминированно по seed матча.
    loop {
        let ready: Vec<_> = {
            let tournament = lobby.tournament(tournament_id)?;
            let bracket = tournament.bracket()?;
            bracket
                .matches()
                .filter(|m| m.status() == MatchStatus::Ready)
                .map(|m| m.id)
                .collect()
        };

        let Some(&match_id) = ready.first() else {
            break;
        };

        let details = match handle_query(&lobby, Query::GetMatch { tournament_id, match_id })? {
            QueryResponse::Match(details) => details,
            _ => break,
        };

        println!(
            "#{} {} ({}) room {}",
            details.view.number, details.round_name, details.best_of, details.room_pass
        );
        for map in &details.playable_maps {
            println!("    {} stage {} [{:?}]", map.mode, map.stage_id, map.source);
        }

        let (upper, lower) = {
            let tournament = lobby.tournament(tournament_id)?;
            let bracket = tournament.bracket()?;
            let m = bracket
                .get(match_id)
                .ok_or(bracket_engine::api::ApiError::MatchNotFound(match_id))?;
            (m.upper_team, m.lower_team)
        };
        let (Some(TeamIdentifier::Team(upper)), Some(TeamIdentifier::Team(lower))) = (upper, lower) else {
            break;
        };

        let coin = RngSeed::for_match(tournament_id, match_id).bytes[0] % 2 == 0;
        let wins = details.best_of.wins_needed();
        let (winner_team_id, score) = if coin {
            (upper, ScoreDetail { upper: wins, lower: wins - 1 })
        } else {
            (lower, ScoreDetail { upper: 0, lower: wins })
        };

        handle_command(
            &mut lobby,
            Command::ReportResult(ReportResultCommand {
                tournament_id,
                match_id,
                winner_team_id,
                score: Some(score),
            }),
        )?;
    }

    let tournament = lobby.tournament(tournament_id)?;
    match tournament.winner_team_id {
        Some(champion) => info!(tournament_id, champion, "champion decided"),
        None => info!(tournament_id, "no champion"),
    }

    let bracket = tournament.bracket()?;
    for m in bracket.matches().filter(|m| m.number > 0) {
        let best_of = TournamentRuntime::best_of_for(&tournament.config, bracket, m.side, m.round);
        println!(
            "{:>3} {:<8} r{} {} vs {} -> {:?} ({})",
            m.number,
            m.side.to_string(),
            m.round,
            m.upper_team.map(|t| t.to_string()).unwrap_or_default(),
            m.lower_team.map(|t| t.to_string()).unwrap_or_default(),
            m.winner.and_then(|w| w.team_id()),
            best_of
        );
    }

    Ok(())
}
